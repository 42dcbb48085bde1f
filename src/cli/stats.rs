// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::Result;

use crate::cli::{describe_api_error, AppContext};
use crate::view::table;

pub async fn show(ctx: &AppContext, json: bool) -> Result<()> {
    let client = ctx.client()?;
    let stats = client.scan_stats().await.map_err(describe_api_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    table::print_stats(&stats);
    Ok(())
}
