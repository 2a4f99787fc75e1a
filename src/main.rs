use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vacancy_hunter::aggregator::Aggregator;
use vacancy_hunter::app::AppContext;
use vacancy_hunter::config::{AppConfig, load_config};
use vacancy_hunter::currency::{BaseCurrency, CbrRates};
use vacancy_hunter::selector::SortOrder;
use vacancy_hunter::source::{HeadHunterSource, SourceAdapter, SuperJobSource};
use vacancy_hunter::storage::{CsvStore, JsonLinesStore, VacancyStore};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let mut app = match build_app(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    run_menu(&mut app, &mut input).await;
    info!("Bye");
}

fn build_app(config: &AppConfig) -> Result<AppContext, reqwest::Error> {
    let mut builder = Client::builder().user_agent("VacancyHunter/0.1 (vacancy-hunter@localhost)");
    if let Some(secs) = config.request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    let sources: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(HeadHunterSource::new(
            client.clone(),
            config.headhunter_url.clone(),
            config.page_size,
        )),
        Arc::new(SuperJobSource::new(
            client.clone(),
            config.superjob_url.clone(),
            config.page_size,
            config.superjob_api_key.clone(),
        )),
    ];
    let rates = Arc::new(CbrRates::new(client, config.rates_url.clone()));
    let aggregator = Aggregator::new(
        sources,
        rates,
        BaseCurrency::new(&config.base_currency_aliases),
        config.abort_on_source_error,
    );

    let stores: Vec<Box<dyn VacancyStore>> = vec![
        Box::new(JsonLinesStore::new(config.json_store_path.clone())),
        Box::new(CsvStore::new(config.csv_store_path.clone())),
    ];
    Ok(AppContext::new(aggregator, stores))
}

async fn prompt(input: &mut Input, text: &str) -> Option<String> {
    print!("{}", text);
    let _ = std::io::stdout().flush();
    match input.next_line().await {
        Ok(Some(line)) => Some(line.trim().to_string()),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read input: {}", e);
            None
        }
    }
}

async fn run_menu(app: &mut AppContext, input: &mut Input) {
    loop {
        println!("1. Search vacancies");
        println!("2. Show vacancies");
        println!("3. Save vacancies to files");
        println!("4. Exit");
        let Some(choice) = prompt(input, "Choose an action: ").await else {
            return;
        };

        match choice.as_str() {
            "1" => {
                if search_and_select(app, input).await.is_none() {
                    return;
                }
            }
            "2" => display(app),
            "3" => {
                if app.vacancies().is_empty() {
                    println!("No vacancies to save.");
                    continue;
                }
                match app.save() {
                    Ok(n) => println!("Saved {} vacancies.", n),
                    Err(e) => {
                        error!("Save failed: {}", e);
                        println!("Failed to save vacancies: {}", e);
                    }
                }
            }
            "4" => return,
            _ => println!("Invalid choice. Try again."),
        }
    }
}

/// Returns `None` once input is exhausted.
async fn search_and_select(app: &mut AppContext, input: &mut Input) -> Option<()> {
    let query = prompt(input, "Enter a job title to search for: ").await?;
    match app.search(&query).await {
        Ok(n) => println!("Found {} vacancies.", n),
        Err(e) => {
            error!("Search failed: {}", e);
            println!("Search failed: {}", e);
            return Some(());
        }
    }

    let k = loop {
        let answer = prompt(input, "How many top vacancies do you need: ").await?;
        match answer.parse::<usize>() {
            Ok(k) => break k,
            Err(_) => println!("Enter a non-negative number."),
        }
    };

    let order = loop {
        println!("1. Sort by date");
        println!("2. Sort by salary");
        match prompt(input, "Choose sorting: ").await?.as_str() {
            "1" => break SortOrder::ByDate,
            "2" => break SortOrder::BySalary,
            _ => println!("Invalid choice. Try again."),
        }
    };

    if let Some(short) = app.select(k, order) {
        println!("Unfortunately only {} vacancies were found.", short.available);
    }
    Some(())
}

fn display(app: &AppContext) {
    if app.vacancies().is_empty() {
        println!("No vacancies available.");
        return;
    }
    println!("Vacancies:");
    for vacancy in app.vacancies() {
        println!("{}", vacancy);
    }
}
