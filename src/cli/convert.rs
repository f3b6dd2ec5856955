use super::{history, ui};
use crate::core::{Conversion, ConversionRequest, Converter, CurrencyCatalog, money};
use anyhow::{Result, bail};
use comfy_table::Cell;
use futures::future::join_all;
use std::iter;
use tracing::debug;

type Outcome = (String, crate::core::Result<Option<Conversion>>);

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Upper-cases the selected targets, dropping blanks and repeats.
pub fn normalize_targets(targets: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(targets.len());
    for code in targets.iter().map(|t| normalize_code(t)) {
        if !code.is_empty() && !normalized.contains(&code) {
            normalized.push(code);
        }
    }
    normalized
}

/// Rejects codes the catalog does not know before any request is made.
pub fn validate_selection(catalog: &CurrencyCatalog, base: &str, targets: &[String]) -> Result<()> {
    for code in iter::once(base).chain(targets.iter().map(String::as_str)) {
        if !catalog.contains(code) {
            bail!("Unknown currency code: {code}. Run `fxconv currencies` to list supported codes.");
        }
    }
    Ok(())
}

fn render_results(base: &str, amount: f64, outcomes: &[Outcome]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
        ui::header_cell("Converted"),
    ]);

    let mut failures = Vec::new();
    let mut converted = 0;
    for (target, outcome) in outcomes {
        match outcome {
            Ok(Some(conversion)) => {
                converted += 1;
                table.add_row(vec![
                    Cell::new(format!("{amount} {base}")),
                    Cell::new(format!("{} - {}", target, conversion.entry.country_name)),
                    ui::number_cell(&conversion.rate.to_string()),
                    ui::amount_cell(&format!(
                        "{} {}",
                        conversion.entry.symbol, conversion.entry.result
                    )),
                ]);
            }
            Ok(None) => debug!(%target, "Conversion skipped"),
            Err(e) if e.is_conversion_failure() => {
                debug!(%target, error = %e, "Reporting failed conversion");
                failures.push(ui::style_text(
                    &format!("Conversion failed for {target}."),
                    ui::StyleType::Error,
                ));
            }
            Err(e) => failures.push(ui::style_text(
                &format!("Could not convert {target}: {e}"),
                ui::StyleType::Error,
            )),
        }
    }

    let mut output = String::new();
    if converted > 0 {
        output.push_str(&table.to_string());
    }
    for failure in failures {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&failure);
    }
    output
}

pub async fn run(converter: &Converter, base: &str, targets: &[String], amount: f64) -> Result<()> {
    let base = normalize_code(base);
    let targets = normalize_targets(targets);
    if targets.is_empty() {
        println!("No target currency selected.");
        return Ok(());
    }
    validate_selection(converter.catalog(), &base, &targets)?;
    money::validate_amount(amount)?;

    let pb = ui::new_progress_bar(targets.len() as u64, true);
    pb.set_message("Fetching rates...");

    let conversion_futures = targets.iter().map(|target| {
        let pb_clone = pb.clone();
        let request = ConversionRequest::new(&base, target, amount);
        async move {
            let res = converter.convert(&request).await;
            pb_clone.inc(1);
            (request.target, res)
        }
    });
    let outcomes: Vec<Outcome> = join_all(conversion_futures).await;
    pb.finish_and_clear();

    if let Some(latest) = converter.latest().await {
        println!(
            "{} {} = {}\n",
            latest.amount,
            latest.base,
            ui::style_text(
                &format!(
                    "{} {} {}",
                    latest.entry.symbol, latest.entry.result, latest.entry.code
                ),
                ui::StyleType::Amount
            )
        );
    }
    println!("{}", render_results(&base, amount, &outcomes));

    let history = converter.history();
    let history = history.lock().await;
    println!("\n{}", history::render_history(history.entries()));

    // Rate lookups that failed are reported above; anything else fails the command
    if let Some((target, e)) = outcomes.iter().find_map(|(target, outcome)| match outcome {
        Err(e) if !e.is_conversion_failure() => Some((target, e)),
        _ => None,
    }) {
        bail!("Could not convert {target}: {e}");
    }
    Ok(())
}
