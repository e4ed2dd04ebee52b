use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::time::{Duration, sleep, timeout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskrx_core::impls::{CompletionTask, TaskCompletionSource, spawn_task};
use taskrx_core::{AdapterConfig, RxTask, TaskExt};

/// 外部サブシステムの代わり：呼ぶたびに Task を 1 つ開始する
struct GreetingService {
    remaining_failures: AtomicU32,
}

impl GreetingService {
    fn new(n: u32) -> Self {
        Self {
            remaining_failures: AtomicU32::new(n),
        }
    }

    fn greet(&self, name: &str) -> CompletionTask<String> {
        let left = self.remaining_failures.load(Ordering::Relaxed);
        if left > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
        }
        let name = name.to_string();
        spawn_task(async move {
            sleep(Duration::from_millis(50)).await;
            if left > 0 {
                return Err(io::Error::other(format!("intentional failure (left={left})")));
            }
            Ok(format!("Hello, {name}!"))
        })
    }
}

fn load_config() -> Result<AdapterConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Ok(AdapterConfig::from_json(&raw)?)
        }
        None => Ok(AdapterConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    info!(?config, "adapter config");
    let rx = RxTask::new(config);

    // (A) supplier 版の Single：subscribe のたびに greet() が呼ばれる
    let service = Arc::new(GreetingService::new(2));
    let greeting = rx.single({
        let service = service.clone();
        move || Ok::<_, Infallible>(service.greet("taskrx"))
    });
    for attempt in 1..=3 {
        match greeting.subscribe().await {
            Ok(message) => {
                info!(attempt, %message, "single succeeded");
                break;
            }
            Err(e) => warn!(attempt, error = %e, "single failed"),
        }
    }

    // (B) Completable：値は捨てて完了だけを見る
    let saved = spawn_task(async {
        sleep(Duration::from_millis(20)).await;
        Ok::<_, io::Error>(1_u64)
    });
    saved.completes().subscribe().await?;
    info!("save completed");

    // (C) Maybe：値なしで完了した Task
    let lookup = TaskCompletionSource::<String>::new();
    let found = rx.maybe_from_task(lookup.task()).subscribe();
    lookup.set_empty()?;
    match found.await {
        Ok(Some(v)) => info!(value = %v, "maybe found a value"),
        Ok(None) => info!("maybe completed empty"),
        Err(e) => warn!(error = %e, "maybe failed"),
    }

    // (D) 完了前に dispose：listener は外され、あとから完了しても何も届かない
    let slow = TaskCompletionSource::<String>::new();
    let pending = slow.task().single().subscribe();
    if timeout(Duration::from_millis(30), pending).await.is_err() {
        info!("subscription timed out and was disposed");
    }
    slow.set_value("too late".to_string())?;

    Ok(())
}
