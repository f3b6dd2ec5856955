use super::ui;
use crate::core::{HistoryEntry, HistoryStore};
use anyhow::Result;
use comfy_table::Cell;
use tokio::sync::Mutex;

pub const EMPTY_HISTORY: &str = "Conversion history is empty.";

/// Renders the log as a table, newest first, with the index `delete` takes.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Conversion History", ui::StyleType::Title)
    );

    if entries.is_empty() {
        output.push_str(&ui::style_text(EMPTY_HISTORY, ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Flag"),
        ui::header_cell("Amount"),
        ui::header_cell("Currency"),
        ui::header_cell("Date"),
    ]);

    for (index, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            ui::number_cell(&index.to_string()),
            Cell::new(ui::flag_emoji(&entry.flag)),
            ui::amount_cell(&format!("{} {}", entry.symbol, entry.result)),
            Cell::new(format!("{} - {}", entry.code, entry.country_name)),
            Cell::new(&entry.date),
        ]);
    }

    output.push_str(&table.to_string());
    output
}

pub async fn run(history: &Mutex<HistoryStore>) -> Result<()> {
    let history = history.lock().await;
    println!("{}", render_history(history.entries()));
    Ok(())
}

/// Deletes the entry at `index` and prints what is left.
pub async fn delete(history: &Mutex<HistoryStore>, index: usize) -> Result<()> {
    let mut history = history.lock().await;
    if index >= history.len() {
        println!(
            "{}",
            ui::style_text(
                &format!("No history entry at index {index}."),
                ui::StyleType::Error
            )
        );
    }
    let entries = history.remove_at(index)?;
    println!("{}", render_history(entries));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyInfo;
    use crate::store::MemoryStorage;
    use chrono::Local;
    use std::sync::Arc;

    fn entry(code: &str, result: &str) -> HistoryEntry {
        let currency = CurrencyInfo {
            code: code.to_string(),
            name: "Euro".to_string(),
            symbol: "€".to_string(),
            flag: "eu".to_string(),
        };
        HistoryEntry::new(result.to_string(), &currency, &Local::now())
    }

    #[test]
    fn test_render_empty_history() {
        let output = render_history(&[]);
        assert!(output.contains(EMPTY_HISTORY));
    }

    #[test]
    fn test_render_history_rows() {
        let output = render_history(&[entry("EUR", "92.00"), entry("EUR", "9.00")]);
        assert!(output.contains("€ 92.00"));
        assert!(output.contains("€ 9.00"));
        assert!(output.contains("EUR - Euro"));
        assert!(!output.contains(EMPTY_HISTORY));
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let mut store = HistoryStore::load(Arc::new(MemoryStorage::new()));
        store.append(entry("EUR", "1.00")).unwrap();
        store.append(entry("EUR", "2.00")).unwrap();
        let history = Mutex::new(store);

        delete(&history, 0).await.unwrap();

        let store = history.lock().await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].result, "1.00");
    }

    #[tokio::test]
    async fn test_delete_out_of_range_keeps_entries() {
        let mut store = HistoryStore::load(Arc::new(MemoryStorage::new()));
        store.append(entry("EUR", "1.00")).unwrap();
        let history = Mutex::new(store);

        delete(&history, 5).await.unwrap();

        assert_eq!(history.lock().await.len(), 1);
    }
}
