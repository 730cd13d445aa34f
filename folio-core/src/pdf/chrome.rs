//! Headless Chrome engine.
//!
//! Each job launches its own browser with a fixed window size and device
//! scale factor, opens one tab, waits for the page to settle and prints it.
//! The browser is torn down when the job ends.

use super::{mm_to_inches, PrintJob, RenderEngine};
use crate::error::FolioError;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use which::which;

/// How long the resource count must stay flat before the page counts as idle.
const NETWORK_QUIET_MS: u64 = 500;

/// Waits for the load event, web fonts, images, network quiet and two
/// animation frames, then reports the font loading status.
const READINESS_SCRIPT: &str = r#"
(async () => {
  const deadline = Date.now() + __DEADLINE_MS__;
  if (document.readyState !== 'complete') {
    await new Promise(resolve => window.addEventListener('load', resolve, { once: true }));
  }
  await document.fonts.ready;
  await Promise.all(Array.from(document.images).map(img => img.complete ? null :
    new Promise(resolve => {
      img.addEventListener('load', resolve, { once: true });
      img.addEventListener('error', resolve, { once: true });
    })));
  let seen = performance.getEntriesByType('resource').length;
  let quietSince = Date.now();
  while (Date.now() - quietSince < __QUIET_MS__ && Date.now() < deadline) {
    await new Promise(resolve => setTimeout(resolve, 50));
    const now = performance.getEntriesByType('resource').length;
    if (now !== seen) {
      seen = now;
      quietSince = Date.now();
    }
  }
  await new Promise(resolve => requestAnimationFrame(() => requestAnimationFrame(resolve)));
  return document.fonts.status;
})()
"#;

/// Production [`RenderEngine`] backed by headless Chrome/Chromium.
#[derive(Debug, Default, Clone)]
pub struct ChromeEngine {
    binary: Option<PathBuf>,
}

impl ChromeEngine {
    /// Locate the browser lazily, on the first print.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(path.into()),
        }
    }

    fn binary(&mut self) -> Result<PathBuf, FolioError> {
        if let Some(path) = &self.binary {
            return Ok(path.clone());
        }
        let path = resolve_chrome_binary()?;
        self.binary = Some(path.clone());
        Ok(path)
    }
}

impl RenderEngine for ChromeEngine {
    fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>, FolioError> {
        let options = job.options;
        let binary = self.binary()?;
        let scale_arg = format!("--force-device-scale-factor={}", options.device_scale_factor);

        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(Some(binary.clone()))
            .window_size(Some(options.viewport))
            .idle_browser_timeout(options.timeout)
            .args(vec![
                OsStr::new(&scale_arg),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--allow-file-access-from-files"),
            ])
            .build()
            .map_err(|e| FolioError::render(format!("invalid launch options: {e}")))?;

        debug!(chrome = %binary.display(), "launching browser");
        let browser = Browser::new(launch).map_err(|e| {
            FolioError::render(format!(
                "failed to launch Chrome ({}): {e}",
                binary.display()
            ))
        })?;
        let tab = browser
            .new_tab()
            .map_err(|e| FolioError::render(format!("failed to open tab: {e}")))?;
        tab.set_default_timeout(options.timeout);

        tab.navigate_to(job.page_url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| FolioError::render(format!("page did not load: {e}")))?;

        let script = READINESS_SCRIPT
            .replace("__DEADLINE_MS__", &options.timeout.as_millis().to_string())
            .replace("__QUIET_MS__", &NETWORK_QUIET_MS.to_string());
        let status = tab
            .evaluate(&script, true)
            .map_err(|e| FolioError::render(format!("page never became ready: {e}")))?;
        let fonts = status
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        if fonts != "loaded" {
            return Err(FolioError::render(format!(
                "fonts not ready before printing (status: {fonts})"
            )));
        }

        let (paper_width, paper_height) = options.page_size.inches();
        let margins = options.margins;
        let pdf = PrintToPdfOptions {
            landscape: Some(options.landscape),
            display_header_footer: Some(true),
            print_background: Some(true),
            scale: Some(1.0),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(mm_to_inches(margins.top)),
            margin_bottom: Some(mm_to_inches(margins.bottom)),
            margin_left: Some(mm_to_inches(margins.left)),
            margin_right: Some(mm_to_inches(margins.right)),
            header_template: Some(job.header_template.to_string()),
            footer_template: Some(job.footer_template.to_string()),
            prefer_css_page_size: Some(false),
            ..Default::default()
        };

        tab.print_to_pdf(Some(pdf))
            .map_err(|e| FolioError::render(format!("print failed: {e}")))
    }
}

/// Find a Chrome/Chromium binary.
///
/// `FOLIO_CHROME_BIN` wins, then `GOOGLE_CHROME_BIN` and `CHROME_BIN`, then
/// well-known executable names on `PATH`, then platform install locations.
pub fn resolve_chrome_binary() -> Result<PathBuf, FolioError> {
    for var in ["FOLIO_CHROME_BIN", "GOOGLE_CHROME_BIN", "CHROME_BIN"] {
        if let Some(path) = env::var_os(var) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
    }

    for candidate in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
        "msedge",
    ] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    let platform_paths: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
            "/snap/bin/chromium",
        ]
    };
    if let Some(path) = platform_paths
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
    {
        return Ok(path);
    }

    Err(FolioError::render(
        "unable to locate a Chrome/Chromium binary; set FOLIO_CHROME_BIN to override detection",
    ))
}
