use lsif_upload_core::contract::BrowserLauncher;

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        tracing::debug!(url, "Launching browser");
        open::that(url)
    }
}
