//! 关闭信号辅助函数
//!
//! 关闭信号统一使用 `watch::Receiver<bool>`，`true` 表示请求关闭。
//! 发送端被丢弃同样视为关闭，避免任务永远无人唤醒。

use tokio::sync::watch;

/// 非阻塞地检查是否已请求关闭
pub fn is_shutdown(shutdown_rx: &watch::Receiver<bool>) -> bool {
    *shutdown_rx.borrow() || shutdown_rx.has_changed().is_err()
}

/// 等待关闭信号
pub async fn wait_for_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow_and_update() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}
