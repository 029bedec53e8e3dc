use crate::errors::AppError;
use crate::journal::Journal;
use crate::storage::SnapshotFile;
use crate::themes::Theme;
use crate::ticker::Ticker;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Mutex<Journal>>,
    pub ticker: Arc<Mutex<Option<Ticker>>>,
    pub snapshot_file: Option<SnapshotFile>,
    pub theme: &'static Theme,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(journal: Journal, snapshot_file: Option<SnapshotFile>, theme: &'static Theme) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
            ticker: Arc::new(Mutex::new(None)),
            snapshot_file,
            theme,
            http: reqwest::Client::new(),
        }
    }

    /// Replaces any previous ticker, which aborts it.
    pub async fn start_ticker(&self) {
        let ticker = Ticker::spawn(Arc::clone(&self.journal));
        *self.ticker.lock().await = Some(ticker);
    }

    pub async fn stop_ticker(&self) {
        self.ticker.lock().await.take();
    }

    /// Write the record store to the snapshot file, if one is configured.
    pub async fn persist(&self, journal: &Journal) -> Result<(), AppError> {
        match &self.snapshot_file {
            Some(file) => file.save(&journal.snapshot()).await,
            None => Ok(()),
        }
    }
}
