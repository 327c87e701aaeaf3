use super::ui;
use crate::core::ExchangeRate;
use crate::service::ExchangeRateService;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use std::collections::BTreeMap;

const FETCH_MESSAGE: &str = "Fetching ECB reference rates...";

/// Renders one table per date, rates expressed against `base`.
pub fn display_rates(base: &str, rates: &[ExchangeRate]) -> String {
    if rates.is_empty() {
        return ui::style_text("No rates published for the requested range.", ui::StyleType::Subtle);
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&ExchangeRate>> = BTreeMap::new();
    for rate in rates {
        by_date.entry(rate.date).or_default().push(rate);
    }

    let mut output = format!(
        "Base currency: {}\n",
        ui::style_text(base, ui::StyleType::Title)
    );

    for (date, day_rates) in by_date {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Per 1 {base}")),
        ]);
        for rate in day_rates {
            table.add_row(vec![
                ui::currency_cell(&rate.currency_code, rate.currency_code == base),
                ui::rate_cell(rate.rate),
            ]);
        }

        output.push_str(&format!(
            "\n{}\n{}\n",
            ui::style_text(&date.to_string(), ui::StyleType::Label),
            table
        ));
    }

    output
}

pub fn display_currencies(currencies: &[String]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency")]);
    for code in currencies {
        table.add_row(vec![Cell::new(code)]);
    }
    format!(
        "{}\n{}",
        table,
        ui::style_text(
            &format!("{} currencies", currencies.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run_currencies(service: &ExchangeRateService) -> Result<()> {
    let spinner = ui::new_spinner(FETCH_MESSAGE);
    let result = service.currencies().await;
    spinner.finish_and_clear();

    println!("{}", display_currencies(&result?));
    Ok(())
}

pub async fn run_rates(
    service: &ExchangeRateService,
    currency: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let spinner = ui::new_spinner(FETCH_MESSAGE);
    let result = service.rates(currency, start, end).await;
    spinner.finish_and_clear();

    println!("{}", display_rates(currency.trim(), &result?));
    Ok(())
}

pub async fn run_latest(service: &ExchangeRateService, currency: &str) -> Result<()> {
    let spinner = ui::new_spinner(FETCH_MESSAGE);
    let result = service.latest_rates(currency).await;
    spinner.finish_and_clear();

    println!("{}", display_rates(currency.trim(), &result?));
    Ok(())
}
