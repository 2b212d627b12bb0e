//! ログ初期化

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// tracingサブスクライバを初期化
///
/// `RUST_LOG` が設定されていればそれを優先し、なければ `info`（verbose時は `debug`）。
/// 2回目以降の呼び出しは何もしない。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
