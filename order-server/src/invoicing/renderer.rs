//! Invoice renderer
//!
//! Renders an order snapshot into a minimal single-page PDF. Output is a
//! pure function of the snapshot: no clocks, no random IDs, so the same
//! order always renders to byte-identical output.

use chrono::{TimeZone, Utc};

use super::types::InvoiceSnapshot;

/// A4 in PDF points
const PAGE_WIDTH: i32 = 595;
const PAGE_HEIGHT: i32 = 842;
const MARGIN_LEFT: i32 = 56;
const TOP_START: i32 = PAGE_HEIGHT - 72;

/// Minimal PDF builder
///
/// Accumulates text lines and assembles a valid one-page document
/// (catalog, page tree, Helvetica font, content stream, xref table).
/// Only the handful of operations the invoice layout needs.
struct PdfBuilder {
    /// (font size, y position, text)
    lines: Vec<(i32, i32, String)>,
    cursor_y: i32,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            cursor_y: TOP_START,
        }
    }

    /// Large heading line
    fn heading(&mut self, s: &str) -> &mut Self {
        self.lines.push((18, self.cursor_y, s.to_string()));
        self.cursor_y -= 28;
        self
    }

    /// Regular body line
    fn line(&mut self, s: &str) -> &mut Self {
        self.lines.push((10, self.cursor_y, s.to_string()));
        self.cursor_y -= 14;
        self
    }

    /// Empty line
    fn blank(&mut self) -> &mut Self {
        self.cursor_y -= 14;
        self
    }

    /// Horizontal separator
    fn sep(&mut self) -> &mut Self {
        self.line(&"-".repeat(72))
    }

    /// Escape a string for a PDF literal string object
    fn escape(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '(' => out.push_str("\\("),
                ')' => out.push_str("\\)"),
                // Helvetica/WinAnsi 之外的字符以 ? 占位，保持字节流合法
                c if c.is_ascii_graphic() || c == ' ' => out.push(c),
                _ => out.push('?'),
            }
        }
        out
    }

    /// Assemble the final document
    fn build(&self) -> Vec<u8> {
        let mut content = String::from("BT\n");
        for (size, y, text) in &self.lines {
            content.push_str(&format!(
                "/F1 {} Tf 1 0 0 1 {} {} Tm ({}) Tj\n",
                size,
                MARGIN_LEFT,
                y,
                Self::escape(text)
            ));
        }
        content.push_str("ET\n");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT
            ),
            format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut buf: Vec<u8> = Vec::with_capacity(2048);
        buf.extend_from_slice(b"%PDF-1.4\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(buf.len());
            buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_offset = buf.len();
        buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );

        buf
    }
}

/// Invoice renderer
#[derive(Debug, Clone)]
pub struct InvoiceRenderer;

impl InvoiceRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an order snapshot to PDF bytes
    pub fn render(&self, snapshot: &InvoiceSnapshot) -> Vec<u8> {
        let order = &snapshot.order;
        let product = &snapshot.product;
        let address = &snapshot.address;

        let mut b = PdfBuilder::new();

        b.heading("INVOICE");
        b.line(&format!("Order no. {}", order.id));
        b.line(&format!("Date: {}", format_date(order.created_at)));
        b.blank();

        b.line(&format!("Billed to: {} <{}>", order.customer_name, order.customer_email));
        b.line(&format!("Ship to:   {}", address.recipient));
        b.line(&format!("           {}", address.street));
        b.line(&format!(
            "           {} {}, {}",
            address.postal_code, address.city, address.country
        ));
        b.sep();

        b.line(&format!(
            "{}  ({})  x{}  @ {:.2}",
            product.name, product.slug, order.quantity, product.discount_price
        ));
        b.sep();
        b.blank();
        b.line(&format!("TOTAL: {:.2}", order.final_price));
        b.line(&format!("Status at issue: {}", order.status));

        b.build()
    }

    /// Render the fallback document served when no order can be resolved
    pub fn render_default(&self) -> Vec<u8> {
        let mut b = PdfBuilder::new();
        b.heading("INVOICE");
        b.blank();
        b.line("No invoice is available for this order.");
        b.build()
    }
}

impl Default for InvoiceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Epoch millis → `YYYY-MM-DD` (UTC)
fn format_date(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Address, Order, OrderStatus, Product};

    fn snapshot() -> InvoiceSnapshot {
        InvoiceSnapshot {
            order: Order {
                id: 42,
                customer_id: "cust-1".into(),
                customer_name: "Jo (Doe)".into(),
                customer_email: "jo@example.com".into(),
                address_id: 7,
                product_id: 9,
                quantity: 2,
                final_price: 39.98,
                status: OrderStatus::Placed,
                created_at: 1_735_689_600_000, // 2025-01-01
                updated_at: 1_735_689_600_000,
            },
            product: Product {
                id: 9,
                slug: "red-hoodie".into(),
                name: "Red Hoodie".into(),
                price: 24.99,
                discount_price: 19.99,
                stock: 5,
                is_active: true,
                created_at: 0,
                updated_at: 0,
            },
            address: Address {
                id: 7,
                customer_id: "cust-1".into(),
                recipient: "Jo Doe".into(),
                street: "1 Main St".into(),
                city: "Springfield".into(),
                postal_code: "12345".into(),
                country: "US".into(),
                created_at: 0,
            },
        }
    }

    #[test]
    fn test_render_produces_valid_pdf_frame() {
        let bytes = InvoiceRenderer::new().render(&snapshot());
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Order no. 42"));
        assert!(text.contains("TOTAL: 39.98"));
        // parentheses in the customer name must be escaped inside the stream
        assert!(text.contains("Jo \\(Doe\\)"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = InvoiceRenderer::new();
        let snap = snapshot();
        assert_eq!(renderer.render(&snap), renderer.render(&snap));
    }

    #[test]
    fn test_default_artifact_is_stable_pdf() {
        let renderer = InvoiceRenderer::new();
        let a = renderer.render_default();
        assert!(a.starts_with(b"%PDF-1.4"));
        assert_eq!(a, renderer.render_default());
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(format_date(1_735_689_600_000), "2025-01-01");
    }
}
