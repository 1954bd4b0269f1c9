// データセット前処理専用のカスタムエラー型定義

use serde::Serialize;
use thiserror::Error;

/// 前処理パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("入力が見つかりません: {path}")]
    NotFound { path: String },

    #[error("ラベル画像の読み込みエラー: {path} - {source}")]
    Decode {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("エッジマスクの書き込みエラー: {path} - {source}")]
    Write {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("不正なクラスラベル: 値 {value} (位置 ({x}, {y})) は [0, {n_classes}) の範囲外です")]
    InvalidLabel {
        value: u16,
        x: u32,
        y: u32,
        n_classes: usize,
    },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("チャンネルエラー: {message}")]
    Channel { message: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PrepError {
    /// 入力欠落エラーの作成
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// デコードエラーの作成
    pub fn decode(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// 書き込みエラーの作成
    pub fn write(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// エラー種別を取得（バッチ報告用）
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Write { .. } => ErrorKind::Write,
            Self::InvalidLabel { .. } => ErrorKind::InvalidLabel,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Channel { .. } => ErrorKind::Channel,
            Self::Task { .. } => ErrorKind::Task,
        }
    }

    /// ファイル単位で隔離できるエラーかどうか
    ///
    /// バッチ全体を中断せず BatchReport に記録して継続するのは
    /// このカテゴリのエラーのみ。
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Decode { .. }
                | Self::Write { .. }
                | Self::InvalidLabel { .. }
        )
    }
}

impl From<tokio::task::JoinError> for PrepError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}

/// エラー種別（BatchReport のJSON出力で使う安定した名前）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Write,
    InvalidLabel,
    Configuration,
    Channel,
    Task,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Decode => "Decode",
            Self::Write => "Write",
            Self::InvalidLabel => "InvalidLabel",
            Self::Configuration => "Configuration",
            Self::Channel => "Channel",
            Self::Task => "Task",
        }
    }
}

/// 前処理の結果型
pub type PrepResult<T> = std::result::Result<T, PrepError>;
