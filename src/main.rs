/*
 *  main.rs
 *
 *  wxpaper - weather on paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use anyhow::{Context, Result};
use log::{error, info};

use wxpaper::config;
use wxpaper::display::DisplaySinkFactory;
use wxpaper::fonts::{DASHBOARD_SIZES, FontTable};
use wxpaper::icons::IconStore;
use wxpaper::logging;
use wxpaper::pipeline::run_pass;
use wxpaper::render::RenderContext;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = config::load().context("loading configuration")?;

    let log_file = config.log_file();
    logging::init(config.log_level(), &log_file).context("initialising logging")?;

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);
    info!("Weather display script started.");

    let fonts = if config.builtin_fonts() {
        info!("Using built-in bitmap faces");
        FontTable::builtin()
    } else {
        let font_path = config.font_path();
        FontTable::load(&font_path, &DASHBOARD_SIZES)
            .with_context(|| format!("loading font table from {}", font_path.display()))?
    };
    let ctx = RenderContext::new(fonts, IconStore::new(config.icon_dir()));

    let mut sink = DisplaySinkFactory::create_from_config(&config.display())
        .context("opening display sink")?;

    if let Err(e) = run_pass(&config, &ctx, sink.as_mut()).await {
        error!("Weather display update failed: {}", e);
        std::process::exit(1);
    }

    info!("Weather display script finished.");
    Ok(())
}
