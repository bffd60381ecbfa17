//! Scripted browsing sessions.
//!
//! A scenario is a TOML file of `[[step]]` tables executed in order
//! against a [`Browser`]:
//!
//! ```toml
//! auto_commit = true
//!
//! [[step]]
//! action = "load"
//! url = "http://www.a.com/1"
//!
//! [[step]]
//! action = "back"
//!
//! [[step]]
//! action = "dump_menus"
//! ```
//!
//! With `auto_commit` (the default) renderer reports are applied after
//! every step; otherwise only the `commit` step applies them.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tabnav_history::{NavigationEntry, SessionSnapshot};
use tabnav_menu::MenuDirection;
use tabnav_types::{PageTransition, Result, TabnavError};
use url::Url;

use crate::browser::{Browser, Tab};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Load {
        url: String,
        #[serde(default)]
        typed: bool,
    },
    Back,
    Forward,
    GoToIndex {
        index: usize,
    },
    Reload {
        #[serde(default = "yes")]
        check_for_repost: bool,
        /// How to answer a repost prompt, if one appears.
        #[serde(default)]
        accept_repost: bool,
    },
    Remove {
        index: usize,
    },
    Transient {
        url: String,
    },
    /// Set the committed entry's title.
    Title {
        title: String,
    },
    /// Mark the committed entry as the result of a form POST.
    Post,
    Commit,
    NewTab {
        #[serde(default)]
        url: Option<String>,
    },
    CloseTab {
        index: usize,
    },
    DuplicateTab,
    /// Switch to the tab at `index` in the strip.
    Activate {
        index: usize,
    },
    /// Open a tab from a session file written by `TABNAV_SESSION`.
    Restore {
        path: PathBuf,
    },
    DumpHistory,
    DumpMenus,
}

fn yes() -> bool {
    true
}

/// A parsed scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "yes")]
    pub auto_commit: bool,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Run every step, returning the lines produced by `dump_*` steps.
    ///
    /// Steps that cannot apply (going back with nothing behind, an index
    /// out of range, no open tab) stop the run with a scenario error.
    pub fn run(&self, browser: &mut Browser) -> Result<Vec<String>> {
        let mut output = Vec::new();
        for (n, step) in self.steps.iter().enumerate() {
            log::debug!("Step {}: {step:?}", n + 1);
            run_step(browser, step, &mut output)
                .map_err(|e| TabnavError::Scenario(format!("step {}: {e}", n + 1)))?;
            if self.auto_commit {
                if let Some(tab) = browser.active_tab_mut() {
                    tab.pump();
                }
            }
            browser.end_turn();
        }
        Ok(output)
    }
}

fn parse_url(text: &str) -> Result<Url> {
    Url::parse(text.trim()).map_err(|e| TabnavError::InvalidUrl(format!("{text}: {e}")))
}

fn active(browser: &mut Browser) -> Result<&mut Tab> {
    browser
        .active_tab_mut()
        .ok_or_else(|| TabnavError::Scenario("no open tab".into()))
}

fn run_step(browser: &mut Browser, step: &Step, output: &mut Vec<String>) -> Result<()> {
    match step {
        Step::Load { url, typed } => {
            let transition = if *typed {
                PageTransition::TYPED
            } else {
                PageTransition::LINK
            };
            active(browser)?.history.load_url_str(url, None, transition)?;
        }
        Step::Back => {
            let tab = active(browser)?;
            if !tab.history.can_go_back() {
                return Err(TabnavError::Scenario("cannot go back".into()));
            }
            tab.history.go_back();
        }
        Step::Forward => {
            let tab = active(browser)?;
            if !tab.history.can_go_forward() {
                return Err(TabnavError::Scenario("cannot go forward".into()));
            }
            tab.history.go_forward();
        }
        Step::GoToIndex { index } => {
            let tab = active(browser)?;
            check_index(*index, tab.history.entry_count())?;
            tab.history.go_to_index(*index);
        }
        Step::Reload {
            check_for_repost,
            accept_repost,
        } => {
            active(browser)?.history.reload(*check_for_repost);
            browser.answer_reposts(*accept_repost);
        }
        Step::Remove { index } => {
            let tab = active(browser)?;
            tab.history.discard_non_committed_entries();
            check_index(*index, tab.history.entry_count())?;
            tab.history.remove_entry_at_index(*index, None);
        }
        Step::Transient { url } => {
            let entry = NavigationEntry::new(parse_url(url)?, None, PageTransition::LINK);
            active(browser)?.history.add_transient_entry(entry);
        }
        Step::Title { title } => {
            let tab = active(browser)?;
            let index = committed_index(tab)?;
            tab.history.update_entry(index, |e| e.title.clone_from(title));
        }
        Step::Post => {
            let tab = active(browser)?;
            let index = committed_index(tab)?;
            tab.history.update_entry(index, |e| e.has_post_data = true);
        }
        Step::Commit => {
            let committed = active(browser)?.pump();
            log::info!("Applied {committed} commit report(s)");
        }
        Step::NewTab { url } => {
            let url = url.as_deref().map(parse_url).transpose()?;
            browser.add_tab(url)?;
        }
        Step::CloseTab { index } => {
            check_index(*index, browser.tab_count())?;
            let id = browser.tabs()[*index].id;
            browser.close_tab(id);
        }
        Step::DuplicateTab => {
            let id = active(browser)?.id;
            browser.duplicate_tab(id)?;
        }
        Step::Activate { index } => browser.activate(*index)?,
        Step::Restore { path } => {
            let snapshot = SessionSnapshot::from_json(&std::fs::read_to_string(path)?)?;
            let id = browser.restore_tab(snapshot)?;
            log::info!("Restored {} into {id}", path.display());
        }
        Step::DumpHistory => {
            emit(output, "history", browser.history_lines());
        }
        Step::DumpMenus => {
            emit(output, "back menu", browser.menu_lines(MenuDirection::Backward));
            emit(output, "forward menu", browser.menu_lines(MenuDirection::Forward));
        }
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(TabnavError::Scenario(format!(
            "index {index} out of range ({len} entries)"
        )));
    }
    Ok(())
}

fn committed_index(tab: &Tab) -> Result<usize> {
    tab.history
        .last_committed_index()
        .ok_or_else(|| TabnavError::Scenario("nothing committed".into()))
}

fn emit(output: &mut Vec<String>, heading: &str, lines: Vec<String>) {
    log::info!("{heading}:");
    output.push(format!("{heading}:"));
    for line in lines {
        log::info!("{line}");
        output.push(line);
    }
}
