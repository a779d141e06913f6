//! Open a game's detail view

use anyhow::Result;
use std::sync::Arc;

use crate::modal::{DetailModal, Dismiss};
use crate::page::Page;
use crate::Codenour;

/// Load a game document through the detail modal and print its overlay
pub async fn run(app: &Codenour, document: &str) -> Result<()> {
    let page = Arc::new(Page::new());
    let modal = DetailModal::new(
        Arc::clone(&page),
        &app.config,
        app.fetcher()?,
        app.converter(),
    );

    if let Err(e) = modal.show(document).await {
        for notice in page.notices() {
            eprintln!("{}", notice);
        }
        return Err(e.into());
    }

    for overlay in page.overlays() {
        println!("{}", overlay);
    }
    modal.dismiss(Dismiss::CloseButton);
    Ok(())
}
