use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use usergraph_core::{ConnectReport, GraphError, LinkOutcome, UserGraph};
use usergraph_server::{ServerConfig, UserGraphServer};
use usergraph_store::{HttpObjectStore, InMemoryObjectStore};
use usergraph_types::{NodeId, User};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    match cli.command {
        Command::Serve(args) => runtime.block_on(cmd_serve(config, args)),
        Command::User(args) => runtime.block_on(cmd_user(&config, &cli.format, args)),
        Command::Connect(args) => runtime.block_on(cmd_connect(&config, &cli.format, args)),
        Command::Link(args) => runtime.block_on(cmd_link(&config, &cli.format, args)),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(url) = &cli.store_url {
        config.store.base_url = url.clone();
    }
    Ok(config)
}

fn remote_graph(config: &ServerConfig) -> anyhow::Result<UserGraph<HttpObjectStore>> {
    let store = HttpObjectStore::new(&config.store).context("configuring object store client")?;
    Ok(UserGraph::new(Arc::new(store)))
}

fn id(raw: &str) -> anyhow::Result<NodeId> {
    NodeId::parse(raw).with_context(|| format!("invalid user id {raw:?}"))
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    let server = if args.in_memory {
        println!("{} serving from an in-memory store; data is lost on exit", "!".yellow().bold());
        UserGraphServer::with_store(config, Arc::new(InMemoryObjectStore::new()))
    } else {
        UserGraphServer::new(config)?
    };
    println!(
        "usergraph server on {} (store: {})",
        server.config().bind_addr.to_string().bold(),
        server.store_location().blue()
    );
    server.serve().await?;
    Ok(())
}

async fn cmd_user(config: &ServerConfig, format: &OutputFormat, args: UserArgs) -> anyhow::Result<()> {
    let graph = remote_graph(config)?;
    match args.action {
        UserAction::Create { name } => {
            let user = graph.create_user(&name).await?;
            print_user(format, "Created", &user);
        }
        UserAction::Show { id: raw } => {
            let user = graph.find_user(&id(&raw)?).await?;
            print_user(format, "User", &user);
        }
        UserAction::Rename { id: raw, name } => {
            let user = graph.update_user(&id(&raw)?, &name).await?;
            print_user(format, "Renamed", &user);
        }
        UserAction::Connections { id: raw } => {
            let users = graph.list_connected_users(&id(&raw)?).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
                OutputFormat::Text if users.is_empty() => println!("No connections."),
                OutputFormat::Text => {
                    for user in &users {
                        println!("  {} {}", user.id.to_string().yellow(), user.name);
                    }
                }
            }
        }
    }
    Ok(())
}

async fn cmd_connect(config: &ServerConfig, format: &OutputFormat, args: ConnectArgs) -> anyhow::Result<()> {
    let graph = remote_graph(config)?;
    let (a, b) = (id(&args.a)?, id(&args.b)?);
    let report = match graph.connect(&a, &b).await {
        Ok(report) => report,
        Err(GraphError::PartialFailure { completed, pending, cause }) => {
            eprintln!("{} {} complete, {} pending: {}", "✗".red().bold(), completed, pending, cause);
            eprintln!("  retry with: usergraph link {} {}", pending.from, pending.to);
            anyhow::bail!("connection between {a} and {b} is half complete");
        }
        Err(e) => return Err(e.into()),
    };
    print_report(format, &a, &b, &report);
    Ok(())
}

async fn cmd_link(config: &ServerConfig, format: &OutputFormat, args: LinkArgs) -> anyhow::Result<()> {
    let graph = remote_graph(config)?;
    let (from, to) = (id(&args.from)?, id(&args.to)?);
    let outcome = graph.link(&from, &to).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "from": from, "to": to, "outcome": outcome_label(outcome) })),
        OutputFormat::Text => println!("{} {} → {} {}", "✓".green().bold(), from, to, outcome_label(outcome).dimmed()),
    }
    Ok(())
}

fn outcome_label(outcome: LinkOutcome) -> &'static str {
    match outcome {
        LinkOutcome::Linked => "linked",
        LinkOutcome::AlreadyLinked => "already linked",
    }
}

fn print_user(format: &OutputFormat, verb: &str, user: &User) {
    match format {
        OutputFormat::Json => println!("{}", json!({ "id": user.id, "name": user.name })),
        OutputFormat::Text => println!("{} {} {}", verb.green().bold(), user.id.to_string().yellow(), user.name),
    }
}

fn print_report(format: &OutputFormat, a: &NodeId, b: &NodeId, report: &ConnectReport) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "a": a,
                "b": b,
                "forward": outcome_label(report.forward),
                "backward": outcome_label(report.backward),
            })
        ),
        OutputFormat::Text => {
            println!("{} Connected {} ↔ {}", "✓".green().bold(), a.to_string().yellow(), b.to_string().yellow());
            println!("  {a} → {b}: {}", outcome_label(report.forward));
            println!("  {b} → {a}: {}", outcome_label(report.backward));
        }
    }
}
