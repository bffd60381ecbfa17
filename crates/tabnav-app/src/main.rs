//! tabnav desktop driver.
//!
//! Replays a browsing scenario against a tab strip of simulated renderers
//! and logs the resulting history and back/forward menus. The scenario
//! path comes from the first argument; without one a built-in demo runs.
//! `TABNAV_CONFIG` names an optional TOML config file and
//! `TABNAV_SESSION` a file to write the active tab's session to.

mod browser;
mod renderer;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};

use browser::Browser;
use scenario::Scenario;
use tabnav_menu::MenuDirection;
use tabnav_types::TabnavConfig;

const DEMO_SCENARIO: &str = r#"
[[step]]
action = "new_tab"
url = "http://www.google.com/"

[[step]]
action = "load"
url = "http://www.google.com/search?q=rust"

[[step]]
action = "load"
url = "http://doc.rust-lang.org/book/"

[[step]]
action = "load"
url = "http://doc.rust-lang.org/std/"

[[step]]
action = "load"
url = "http://news.bbc.co.uk/"

[[step]]
action = "load"
url = "http://www.bbc.co.uk/weather"

[[step]]
action = "back"

[[step]]
action = "back"

[[step]]
action = "dump_history"

[[step]]
action = "dump_menus"

[[step]]
action = "load"
url = "http://crates.io/"

[[step]]
action = "dump_history"
"#;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var_os("TABNAV_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            TabnavConfig::load(&path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => TabnavConfig::default(),
    };
    let mut browser = Browser::new(config);
    log::info!(
        "Starting tabnav (history capacity {}, {} menu items)",
        browser.config().history.max_entry_count,
        browser.config().menu.max_history_items,
    );

    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("Replaying {}", path.display());
            Scenario::load(&path).with_context(|| format!("loading scenario {}", path.display()))?
        }
        None => {
            log::info!("No scenario given, running the demo");
            Scenario::from_toml_str(DEMO_SCENARIO)?
        }
    };

    scenario.run(&mut browser)?;

    log::info!("Final state: {} tab(s)", browser.tab_count());
    for line in browser.history_lines() {
        log::info!("{line}");
    }
    for direction in [MenuDirection::Backward, MenuDirection::Forward] {
        log::info!("{direction:?} menu:");
        for line in browser.menu_lines(direction) {
            log::info!("{line}");
        }
    }

    if let Some(path) = std::env::var_os("TABNAV_SESSION") {
        if let Some(tab) = browser.active_tab() {
            let json = tab.history.snapshot().to_json()?;
            std::fs::write(&path, json)
                .with_context(|| format!("writing session {}", PathBuf::from(&path).display()))?;
            log::info!("Saved {} to {}", tab.id, PathBuf::from(&path).display());
        }
    }

    browser.end_turn();
    Ok(())
}
