use super::ui;
use crate::core::CurrencyCatalog;
use anyhow::Result;
use comfy_table::Cell;

pub fn render_catalog(catalog: &CurrencyCatalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Flag"),
    ]);

    for currency in catalog.iter() {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            Cell::new(&currency.symbol),
            Cell::new(ui::flag_emoji(&currency.flag)),
        ]);
    }

    table.to_string()
}

pub fn run(catalog: &CurrencyCatalog) -> Result<()> {
    println!("{}", render_catalog(catalog));
    Ok(())
}
