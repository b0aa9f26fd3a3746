//! Interactive session loop: keyword search, company selection, display menu.

use std::io::{self, Write};
use std::time::Duration;

use avtick_core::{
    AlphaVantage, ApiError, ApiFunction, ClientConfig, DataTable, IndicatorParams, Symbol,
    SymbolMatch,
};

use crate::cli::Cli;
use crate::error::CliError;
use crate::render;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const DISPLAY_MENU: &str = "\
1. Display additional details
2. Display historical prices on specific timeframes
3. Display current quote
4. Indicator results for the company
5. Exit";

/// Entry point for the interactive flow.
///
/// An explicit key (flag or environment) runs one search session; otherwise
/// the key prompt loops, starting a fresh session per entered key until the
/// user submits an empty one.
pub async fn run(cli: &Cli) -> Result<(), CliError> {
    if let Some(key) = explicit_api_key(cli) {
        return Session::new(cli, key).search_loop().await;
    }

    loop {
        let Some(key) = prompt("Please input an api key: ")? else {
            return Ok(());
        };
        if key.is_empty() {
            println!("API Key can not be empty! Thank you for your time!");
            return Ok(());
        }
        Session::new(cli, key).search_loop().await?;
    }
}

fn explicit_api_key(cli: &Cli) -> Option<String> {
    cli.api_key
        .clone()
        .or_else(|| std::env::var("AVTICK_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
}

struct Session {
    api: AlphaVantage,
}

impl Session {
    fn new(cli: &Cli, api_key: String) -> Self {
        let config = ClientConfig::new(api_key)
            .with_timeout(Duration::from_millis(cli.timeout_ms))
            .with_retry(cli.retry_policy());
        Self {
            api: AlphaVantage::new(config),
        }
    }

    async fn search_loop(&self) -> Result<(), CliError> {
        loop {
            let Some(keyword) = prompt("<-> Please input a keyword to search for: ")? else {
                return Ok(());
            };
            if keyword.is_empty() {
                return Ok(());
            }

            let matches = match self.api.search(&keyword).await {
                Ok(matches) => matches,
                Err(error) => {
                    println!("Failed to get matching symbols through API: {error}");
                    continue;
                }
            };
            if matches.is_empty() {
                println!(
                    "Can not find matching companies with the keyword. \
                     Please input another keyword."
                );
                continue;
            }

            for (idx, item) in matches.iter().enumerate() {
                println!("{}. {}\t{}", idx + 1, item.symbol(), item.name());
            }

            match pick_company(matches.len())? {
                Some(selected) => self.display_loop(&matches[selected]).await?,
                None => continue,
            }
        }
    }

    async fn display_loop(&self, company: &SymbolMatch) -> Result<(), CliError> {
        println!("{DISPLAY_MENU}");
        loop {
            let Some(choice) = prompt("<--> Please input a display option for the company: ")?
            else {
                return Ok(());
            };
            match parse_menu_choice(&choice) {
                MenuChoice::Display(option) => self.display(option, company).await,
                MenuChoice::Exit => return Ok(()),
                MenuChoice::OutOfRange => println!("Please input 1/2/3/4/5 to go forward!"),
                MenuChoice::NotANumber => {
                    println!("Please only input a number!");
                    println!("{DISPLAY_MENU}");
                }
            }
        }
    }

    async fn display(&self, option: u32, company: &SymbolMatch) {
        if option == 1 {
            render::print_fields(&company.fields);
            return;
        }

        let symbol = match Symbol::parse(company.symbol()) {
            Ok(symbol) => symbol,
            Err(error) => {
                println!("Can not query this company: {error}");
                return;
            }
        };

        match option {
            2 => {
                let tables = self
                    .api
                    .time_series(
                        &symbol,
                        &[
                            ApiFunction::TimeSeriesWeekly,
                            ApiFunction::TimeSeriesMonthly,
                        ],
                    )
                    .await;
                render_tables(&tables);
            }
            3 => match self.api.quote(&symbol).await {
                Ok(quote) => render::print_fields(&quote.fields),
                Err(error) => {
                    println!("Failed to get the current quote of a symbol through API: {error}");
                }
            },
            _ => {
                let tables = self
                    .api
                    .indicators(
                        &symbol,
                        &[ApiFunction::Sma, ApiFunction::Ema],
                        &IndicatorParams::default(),
                    )
                    .await;
                render_tables(&tables);
            }
        }
    }
}

fn render_tables(tables: &[Result<DataTable, ApiError>]) {
    for table in tables {
        match table {
            Ok(table) => render::print_series(table),
            Err(error) => println!("Failed to fetch a data series: {error}"),
        }
    }
}

enum CompanyChoice {
    Selected(usize),
    Exit,
    OutOfRange,
    NotANumber,
}

fn parse_company_choice(input: &str, count: usize) -> CompanyChoice {
    if input == "x" {
        return CompanyChoice::Exit;
    }
    match input.parse::<usize>() {
        Ok(number) if (1..=count).contains(&number) => CompanyChoice::Selected(number - 1),
        Ok(_) => CompanyChoice::OutOfRange,
        Err(_) => CompanyChoice::NotANumber,
    }
}

fn pick_company(count: usize) -> Result<Option<usize>, CliError> {
    loop {
        let Some(choice) = prompt("<--> Please input a number to select a company: ")? else {
            return Ok(None);
        };
        match parse_company_choice(&choice, count) {
            CompanyChoice::Selected(index) => return Ok(Some(index)),
            CompanyChoice::Exit => return Ok(None),
            CompanyChoice::OutOfRange => println!("The selection number is out of range"),
            CompanyChoice::NotANumber => {
                println!("Please input a number. Or, if you wanna exit, please enter \"x\"");
            }
        }
    }
}

enum MenuChoice {
    Display(u32),
    Exit,
    OutOfRange,
    NotANumber,
}

fn parse_menu_choice(input: &str) -> MenuChoice {
    match input.parse::<u32>() {
        Ok(option @ 1..=4) => MenuChoice::Display(option),
        Ok(5) => MenuChoice::Exit,
        Ok(_) => MenuChoice::OutOfRange,
        Err(_) => MenuChoice::NotANumber,
    }
}

/// Prints a bold prompt and reads one trimmed line; `None` means EOF.
fn prompt(text: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{BOLD}{text}{RESET}")?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}
