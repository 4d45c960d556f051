//! `torc menu ...`: non-interactive menu file editing.
//!
//! The file is read and written with the same parser the daemon uses, so
//! whatever the CLI saves is exactly what order validation will see.

use std::io;

use anyhow::{bail, Context, Result};
use torc_config::{load_existing_layers, TorcConfig};
use torc_store::FileMenu;

/// Resolve the menu file: `--file` wins, else layered config + env.
pub fn open(config_paths: &[String], file: Option<&str>) -> Result<FileMenu> {
    if let Some(f) = file {
        return Ok(FileMenu::new(f));
    }
    let mut cfg = if config_paths.is_empty() {
        TorcConfig::defaults()
    } else {
        load_existing_layers(config_paths)?.0.config
    };
    cfg.apply_env_overrides(|k| std::env::var(k).ok())?;
    Ok(FileMenu::new(cfg.menu.path))
}

fn load(menu: &FileMenu) -> Result<Vec<String>> {
    match menu.load() {
        Ok(items) => Ok(items),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("read menu {}", menu.path().display())),
    }
}

pub fn show(menu: &FileMenu) -> Result<()> {
    let items = load(menu)?;
    if items.is_empty() {
        println!("menu is empty ({})", menu.path().display());
        return Ok(());
    }
    for (i, item) in items.iter().enumerate() {
        println!("{:>3}. {item}", i + 1);
    }
    Ok(())
}

/// Load, apply `f`, save, and print the result.
pub fn edit<F>(menu: &FileMenu, f: F) -> Result<()>
where
    F: FnOnce(&mut Vec<String>) -> Result<()>,
{
    let mut items = load(menu)?;
    f(&mut items)?;
    menu.save(&items)
        .with_context(|| format!("write menu {}", menu.path().display()))?;
    show(menu)
}

fn position(items: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    items.iter().position(|i| i.to_lowercase() == wanted)
}

fn clean(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("menu item name must not be empty");
    }
    if name.contains('\n') || name.contains('"') {
        bail!("menu item name must not contain quotes or newlines");
    }
    Ok(name.to_string())
}

pub fn add_item(items: &mut Vec<String>, name: &str) -> Result<()> {
    let name = clean(name)?;
    if position(items, &name).is_some() {
        bail!("'{name}' is already on the menu");
    }
    items.push(name);
    Ok(())
}

pub fn remove_item(items: &mut Vec<String>, name: &str) -> Result<()> {
    match position(items, name) {
        Some(i) => {
            items.remove(i);
            Ok(())
        }
        None => bail!("'{}' is not on the menu", name.trim()),
    }
}

pub fn rename_item(items: &mut Vec<String>, old: &str, new: &str) -> Result<()> {
    let new = clean(new)?;
    let Some(i) = position(items, old) else {
        bail!("'{}' is not on the menu", old.trim());
    };
    if let Some(j) = position(items, &new) {
        if j != i {
            bail!("'{new}' is already on the menu");
        }
    }
    items[i] = new;
    Ok(())
}
