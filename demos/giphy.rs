//! Fetch random GIFs from the Giphy search API and play them on the
//! panel, one after another, forever.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use argh::FromArgs;
use rand::Rng;
use serde::Deserialize;

use ledmatrix::emulator::Emulator;
use ledmatrix::toolkit::{Canvas, ToolKit};
use ledmatrix::{HardwareConfig, Matrix};

/// Giphy's long-standing public beta key, rate-limited but keyless to use.
const PUBLIC_BETA_KEY: &str = "dc6zaTOxFJmzC";

#[derive(FromArgs)]
/// Play random Giphy search results on the panel.
struct Args {
    /// drive a desktop window instead of real hardware
    #[argh(switch)]
    emulator: bool,

    /// panel/window width
    #[argh(option, default = "64")]
    cols: usize,

    /// panel/window height
    #[argh(option, default = "64")]
    rows: usize,

    /// search query
    #[argh(option, default = "String::from(\"art neon trippy\")")]
    query: String,

    /// giphy API key
    #[argh(option, default = "String::from(PUBLIC_BETA_KEY)")]
    api_key: String,

    /// how long to play each GIF before moving to the next, in seconds
    #[argh(option, default = "15")]
    timeout_secs: u64,
}

fn open_sink(emulator: bool, cols: usize, rows: usize) -> anyhow::Result<Box<dyn Canvas>> {
    if emulator {
        Ok(Box::new(Emulator::new(cols, rows)?))
    } else {
        let config = HardwareConfig { rows, cols, ..HardwareConfig::default() };
        Ok(Box::new(Matrix::new(config).context("failed to open the matrix")?))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<GifItem>,
    meta: Meta,
}

#[derive(Deserialize)]
struct Meta {
    status: u32,
    msg: String,
}

#[derive(Deserialize)]
struct GifItem {
    images: Images,
}

#[derive(Deserialize)]
struct Images {
    fixed_width: FixedWidth,
}

#[derive(Deserialize)]
struct FixedWidth {
    url: String,
}

fn search(api_key: &str, query: &str) -> anyhow::Result<Vec<GifItem>> {
    let resp: SearchResponse = ureq::get("https://api.giphy.com/v1/gifs/search")
        .query("api_key", api_key)
        .query("q", query)
        .query("limit", "100")
        .call()
        .context("giphy search request failed")?
        .into_json()
        .context("decoding giphy search response")?;
    if resp.meta.status != 200 {
        bail!("invalid giphy status {}: {}", resp.meta.status, resp.meta.msg);
    }
    Ok(resp.data)
}

fn fetch_gif(url: &str) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::new();
    ureq::get(url)
        .call()
        .with_context(|| format!("fetching gif {url}"))?
        .into_reader()
        .read_to_end(&mut body)?;
    Ok(body)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut sink = open_sink(args.emulator, args.cols, args.rows)?;
    let items = search(&args.api_key, &args.query)?;
    if items.is_empty() {
        bail!("giphy search for {:?} returned no results", args.query);
    }

    loop {
        let item = &items[rand::thread_rng().gen_range(0..items.len())];
        match fetch_gif(&item.images.fixed_width.url) {
            Ok(body) => {
                let cancel = Arc::new(AtomicBool::new(false));
                let timeout_cancel = Arc::clone(&cancel);
                let timeout = std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_secs(args.timeout_secs));
                    timeout_cancel.store(true, Ordering::Relaxed);
                });
                let mut tk = ToolKit::new(sink.as_mut());
                if let Err(e) = tk.play_gif(body.as_slice(), &cancel) {
                    log::warn!("could not play gif: {e}");
                }
                cancel.store(true, Ordering::Relaxed);
                let _ = timeout.join();
            }
            Err(e) => log::warn!("could not fetch gif: {e}"),
        }
    }
}
