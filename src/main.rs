use clap::Parser;
use faq_parity::config::{ConfigError, ParityConfig};
use faq_parity::pages::collect_pages;
use faq_parity::render::{PrerenderedDirectory, WebDriverRenderer, check_rendered_pages};
use faq_parity::results::{BatchReport, RecordReport};
use faq_parity::store::{DirectoryStore, PageStore};
use faq_parity::{StaticHtmlTarget, jsonld, regenerate_structured_data, validate_with};
use std::error::Error;
use std::process::ExitCode;

mod args;
use args::{Args, Command};

/// Exit status when the run could not be carried out at all
const EXIT_ABORTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_ABORTED);
        }
    };
    ::log::debug!("Using configuration: {:?}", config);

    let outcome = match args.command {
        Command::Validate { inputs } => run_validate(&config, &inputs),
        Command::Generate { inputs, dry_run } => run_generate(&config, &inputs, dry_run),
        Command::CheckRendered {
            inputs,
            live,
            warn_only,
            ..
        } => run_check_rendered(&config, &inputs, live, warn_only).await,
        Command::Inject { inputs } => run_inject(&config, &inputs),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            ::log::error!("Run aborted: {}", e);
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

/// Config file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ParityConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ParityConfig::from_file(path)?,
        None => ParityConfig::default(),
    };
    config.apply_env();

    if let Some(dir) = &args.pages_dir {
        config.pages_dir = dir.clone();
    }
    if let Some(dir) = &args.prerender_dir {
        config.prerender_dir = dir.clone();
    }
    if let Command::CheckRendered {
        base_url, timeout, ..
    } = &args.command
    {
        if let Some(url) = base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = timeout {
            config.render_timeout_secs = *secs;
        }
    }

    config.validate()?;
    Ok(config)
}

fn run_validate(config: &ParityConfig, inputs: &[String]) -> Result<bool, Box<dyn Error>> {
    let store = DirectoryStore::new(&config.pages_dir);
    let pages = collect_pages(inputs, &store, &config.slug_filter()?)?;
    let rules = config.rules();

    let mut report = BatchReport::default();
    for page in pages {
        report.push(match page.record {
            Ok(record) => {
                let issues = validate_with(&record, &rules);
                RecordReport::new(page.origin, record.slug.as_str(), record.faqs.len(), issues)
            }
            Err(e) => RecordReport::unreadable(page.origin, e),
        });
    }

    Ok(print_report(&report))
}

fn run_generate(
    config: &ParityConfig,
    inputs: &[String],
    dry_run: bool,
) -> Result<bool, Box<dyn Error>> {
    let mut store = DirectoryStore::new(&config.pages_dir);
    let filter = config.slug_filter()?;
    let mut load_failures = 0;

    let records = if inputs.is_empty() {
        let mut records = store.fetch_all()?;
        records.retain(|record| filter.admits(&record.slug));
        records
    } else {
        let mut records = Vec::new();
        for page in collect_pages(inputs, &store, &filter)? {
            match page.record {
                Ok(record) => records.push(record),
                Err(e) => {
                    println!("ERROR {}: {}", page.origin, e);
                    load_failures += 1;
                }
            }
        }
        records
    };

    let summary = regenerate_structured_data(&mut store, &records, &config.sync_options(dry_run));
    for failure in &summary.failed {
        println!("ERROR {}: {}", failure.slug, failure.error);
    }
    println!(
        "updated: {}, unchanged: {}, skipped: {}, failed: {}",
        summary.updated,
        summary.unchanged,
        summary.skipped,
        summary.failed.len() + load_failures
    );

    if dry_run && summary.changed_anything() {
        eprintln!(
            "{} page(s) have out-of-date structured data; run `faq-parity generate`",
            summary.updated
        );
        return Ok(false);
    }
    Ok(summary.failed.is_empty() && load_failures == 0)
}

async fn run_check_rendered(
    config: &ParityConfig,
    inputs: &[String],
    live: bool,
    warn_only: bool,
) -> Result<bool, Box<dyn Error>> {
    let store = DirectoryStore::new(&config.pages_dir);
    let mut unreadable = Vec::new();
    let mut records = Vec::new();
    for page in collect_pages(inputs, &store, &config.slug_filter()?)? {
        match page.record {
            Ok(record) => records.push(record),
            Err(e) => unreadable.push(RecordReport::unreadable(page.origin, e)),
        }
    }

    let page_timeout = config.render_timeout();
    let mut report = if live {
        ::log::info!("Rendering against {} via {}", config.base_url, config.webdriver_url);
        let mut renderer = WebDriverRenderer::new(
            config.webdriver_url.as_str(),
            config.base_url()?,
            config.settle_delay(),
        );
        let report =
            check_rendered_pages(&mut renderer, &records, &config.route_prefix, page_timeout).await;
        renderer.close().await;
        report
    } else {
        let mut renderer =
            PrerenderedDirectory::new(&config.prerender_dir, config.route_prefix.as_str());
        check_rendered_pages(&mut renderer, &records, &config.route_prefix, page_timeout).await
    };

    for record in unreadable {
        report.push(record);
    }

    let passed = print_report(&report);
    if !passed && warn_only {
        eprintln!("warn-only: not failing the run");
        return Ok(true);
    }
    Ok(passed)
}

fn run_inject(config: &ParityConfig, inputs: &[String]) -> Result<bool, Box<dyn Error>> {
    let store = DirectoryStore::new(&config.pages_dir);
    let prerendered = PrerenderedDirectory::new(&config.prerender_dir, config.route_prefix.as_str());
    let mut failures = 0;

    for page in collect_pages(inputs, &store, &config.slug_filter()?)? {
        let record = match page.record {
            Ok(record) => record,
            Err(e) => {
                println!("ERROR {}: {}", page.origin, e);
                failures += 1;
                continue;
            }
        };

        let Some(document) = jsonld::generate(&record.faqs) else {
            println!("SKIPPED {} (no FAQs)", record.slug);
            continue;
        };

        let target = StaticHtmlTarget::new(prerendered.path_for_slug(&record.slug));
        match target.apply(&document.to_canonical_string()) {
            Ok(action) => println!("{} {}", action.label(), target.path().display()),
            Err(e) => {
                println!("ERROR {}: {}", target.path().display(), e);
                failures += 1;
            }
        }
    }

    Ok(failures == 0)
}

/// Record lines to stdout, warnings and the summary to stderr
fn print_report(report: &BatchReport) -> bool {
    for record in &report.records {
        println!("{}", record.line());
        for warning in record.warnings() {
            eprintln!("WARN {}: {}", record.origin, warning);
        }
    }
    eprintln!("{}", report.summary());
    report.passed()
}
