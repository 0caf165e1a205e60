//! 发票子系统 - 订单快照渲染为 PDF 并持久化
//!
//! - **types**: InvoiceSnapshot (渲染输入，不可变快照)
//! - **renderer**: InvoiceRenderer (快照 → PDF 字节流，纯函数)
//! - **storage**: InvoiceStore (一次写入的文件存储)
//! - **service**: InvoiceService (缓存优先的获取/生成入口)

pub mod renderer;
pub mod service;
pub mod storage;
pub mod types;

pub use renderer::InvoiceRenderer;
pub use service::InvoiceService;
pub use storage::{InvoiceStore, InvoiceStoreError};
pub use types::InvoiceSnapshot;
