//! Shared application state.

use crate::{config::ServerConfig, infrastructure::Hub};

/// State handed to every axum handler
pub struct AppState {
    /// Hub（クライアントとルームのレジストリ）
    pub hub: Hub,
    /// 接続ごとの設定
    pub config: ServerConfig,
}
