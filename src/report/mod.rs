//! 商品目录 PDF 报表
//!
//! 排版是纯计算（[`layout`]），序列化交给 `lopdf`（[`pdf`]）。HTTP 响应通过
//! [`render`] 得到字节流：文档在阻塞线程上写入一个基于通道的 writer，
//! 每写满一块就作为响应体的一个分片发出。

pub mod layout;
pub mod metrics;
pub mod pdf;

use std::io::{self, BufWriter, Write};

use axum::body::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use crate::app::catalog::model::Item;
use layout::layout_report;
use pdf::write_pdf;

/// 下载文件名
pub const REPORT_FILENAME: &str = "relatorio.pdf";

const CHUNK_SIZE: usize = 8 * 1024;
const CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF 生成失败: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("PDF 写出失败: {0}")]
    Io(#[from] io::Error),
}

/// 一次性生成整份 PDF
pub fn render_to_vec(items: &[Item]) -> Result<Vec<u8>, ReportError> {
    let mut out = Vec::new();
    write_pdf(&layout_report(items), &mut out)?;
    Ok(out)
}

/// 以字节流形式生成 PDF；出错时流以错误结束，响应体被中断
pub fn render(items: Vec<Item>) -> ReceiverStream<io::Result<Bytes>> {
    stream_with(move |out| {
        let layout = layout_report(&items);
        write_pdf(&layout, out)?;
        debug!(rows = layout.rows.len(), pages = layout.pages.len(), "报表已生成");
        Ok(())
    })
}

/// 在阻塞线程上运行 `produce`，写出的数据按块送入通道
fn stream_with<F>(produce: F) -> ReceiverStream<io::Result<Bytes>>
where
    F: FnOnce(&mut BufWriter<ChannelWriter>) -> Result<(), ReportError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, ChannelWriter { tx: tx.clone() });

        let result = produce(&mut writer).and_then(|_| writer.flush().map_err(ReportError::from));
        // 丢弃未发出的缓冲数据，错误必须是流的最后一项
        let _ = writer.into_parts();

        if let Err(e) = result {
            error!(error = %e, "报表生成失败");
            let _ = tx.blocking_send(Err(io::Error::new(io::ErrorKind::Other, e.to_string())));
        }
    });

    ReceiverStream::new(rx)
}

/// 把写入的数据转发到通道；接收端关闭（客户端断开）时返回 `BrokenPipe`
struct ChannelWriter {
    tx: mpsc::Sender<io::Result<Bytes>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "报表接收端已关闭"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
