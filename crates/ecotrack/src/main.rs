//! `ecotrac` - CLI for ecotrack
//!
//! This binary provides the command-line interface for logging emission
//! activities and reviewing reports, recommendations, and achievements.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;

use ecotrack::achievements::evaluate_all;
use ecotrack::analytics::aggregate;
use ecotrack::analytics::insights::{Insights, PersonalMetrics};
use ecotrack::catalog::total_potential_savings;
use ecotrack::cli::{
    AchievementsCommand, Cli, Command, ConfigCommand, ExportCommand, LogCommand, LoginCommand,
    OutputFormat, ProfileCommand, RecommendCommand, RegisterCommand, ReportCommand, StatusCommand,
};
use ecotrack::export::{export_csv, export_filename};
use ecotrack::user::NewUser;
use ecotrack::{init_logging, Catalog, Config, Session, SessionStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Assemble the session: demo catalog plus the saved snapshot
    let catalog = Catalog::load(config.catalog_path())?;
    let mut session = Session::new(&catalog, SessionStore::new(config.session_path()));
    session.resume()?;

    let today = Local::now().date_naive();

    // Execute the command
    match cli.command {
        Command::Login(cmd) => handle_login(&mut session, &cmd),
        Command::Register(cmd) => handle_register(&mut session, cmd),
        Command::Logout => handle_logout(&mut session),
        Command::Log(cmd) => handle_log(&mut session, &cmd),
        Command::Status(cmd) => handle_status(&session, &cmd, today),
        Command::Report(cmd) => handle_report(&session, &cmd, &config, today),
        Command::Export(cmd) => handle_export(&session, &cmd, &config, today),
        Command::Recommend(cmd) => handle_recommend(&catalog, &cmd),
        Command::Achievements(cmd) => handle_achievements(&session, &catalog, &cmd),
        Command::Profile(cmd) => handle_profile(&mut session, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_login(session: &mut Session, cmd: &LoginCommand) -> Result<()> {
    let user = session.login(&cmd.email, &cmd.password)?;
    println!("Logged in as {} <{}>", user.name, user.email);
    println!("Total emissions: {:.2} kg CO₂e", user.total_emissions);
    Ok(())
}

fn handle_register(session: &mut Session, cmd: RegisterCommand) -> Result<()> {
    let user = session.register(NewUser {
        name: cmd.name,
        email: cmd.email,
        password: cmd.password,
    })?;
    println!("Welcome, {}! Your account is ready.", user.name);
    println!("Logged in as {}", user.email);
    Ok(())
}

fn handle_logout(session: &mut Session) -> Result<()> {
    let name = session.current().map(|user| user.name.clone());
    session.logout()?;
    match name {
        Some(name) => println!("Logged out {name}."),
        None => println!("No active session."),
    }
    Ok(())
}

fn handle_log(session: &mut Session, cmd: &LogCommand) -> Result<()> {
    let record = session.add_entry(cmd.to_entry())?;
    println!(
        "Logged {:.2} kg CO₂e for {} on {}",
        record.amount,
        record.source_key(),
        record.date
    );
    let user = session.current_user()?;
    println!("Total emissions: {:.2} kg CO₂e", user.total_emissions);
    Ok(())
}

fn handle_status(session: &Session, cmd: &StatusCommand, today: NaiveDate) -> Result<()> {
    let dashboard = session.dashboard(today)?;
    let user = session.current_user()?;

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("ecotrack dashboard");
    println!("------------------");
    println!("User:            {} <{}>", user.name, user.email);
    println!("Member since:    {}", user.joined_date);
    println!("Total emissions: {:.2} kg CO₂e", dashboard.total_emissions);
    println!("This month:      {:.2} kg CO₂e", dashboard.month_to_date);
    println!(
        "Level:           {} ({} XP, {}% through, next at {} XP)",
        dashboard.level, dashboard.xp, dashboard.level_progress_percent, dashboard.next_level_xp
    );
    println!("Streak:          {} days", dashboard.streak);

    if !dashboard.recent_achievements.is_empty() {
        println!();
        println!(
            "Recent achievements: {}",
            dashboard.recent_achievements.join(", ")
        );
    }

    if !dashboard.recent_records.is_empty() {
        println!();
        println!("Recent entries:");
        for record in &dashboard.recent_records {
            println!(
                "  {}  {:<26} {:>8.2} kg  {}",
                record.date,
                record.source_key(),
                record.amount,
                record.description
            );
        }
    }
    Ok(())
}

fn handle_report(
    session: &Session,
    cmd: &ReportCommand,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let records = session.records()?;
    let filter = cmd.filter(config.default_filter());
    let report = aggregate(&records, today, &filter);
    let insights = Insights::from_report(&report);
    let metrics = PersonalMetrics::from_total(report.total);

    if cmd.format == OutputFormat::Json {
        let payload = serde_json::json!({
            "report": report,
            "insights": insights,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Emission report ({}, {})", filter.range, filter.category);
    println!("==================================");
    if report.window_fallback {
        println!("Note: nothing in the selected window; showing all matching records.");
    }
    println!(
        "Total: {:.2} kg CO₂e across {} records",
        report.total, report.record_count
    );

    if report.record_count == 0 {
        return Ok(());
    }

    println!();
    println!("By category:");
    for (category, total) in &report.category_totals {
        println!("  {:<16} {:>10.2} kg", category.to_string(), total);
    }

    println!();
    println!("By month:");
    for month in &report.monthly {
        println!("  {:<16} {:>10.2} kg", month.month, month.total);
    }

    println!();
    println!("Top sources:");
    for source in report.top_sources(10) {
        println!("  {:<26} {:>10.2} kg", source.source, source.total);
    }

    println!();
    println!("Compared with:");
    println!(
        "  National average: {:+.2}%",
        report.comparisons.vs_national_percent
    );
    println!(
        "  Global average:   {:+.2}%",
        report.comparisons.vs_global_percent
    );
    println!(
        "  Target progress:  {:.2}%",
        report.comparisons.target_progress_percent
    );

    println!();
    println!("Against category baselines:");
    for row in &report.category_comparisons {
        println!(
            "  {:<16} {:>10.2} kg  {:>6.2}% of total  national {:+.2}%, global {:+.2}%",
            row.category.to_string(),
            row.total,
            row.share_percent,
            row.vs_national_percent,
            row.vs_global_percent
        );
    }

    println!();
    if let Some(highest) = &insights.highest {
        println!(
            "Highest impact: {} ({:.2} kg, {:.2}% of total)",
            highest.category, highest.total, highest.share_percent
        );
    }
    println!("Trend: {}", insights.trend);
    if insights.reduction_needed_kg > 0.0 {
        println!(
            "Reduction needed to reach target: {:.2} kg CO₂e",
            insights.reduction_needed_kg
        );
    }
    println!(
        "Daily average {:.2} kg, weekly {:.2} kg, annual projection {:.2} kg",
        metrics.daily_average_kg, metrics.weekly_average_kg, metrics.annual_projection_kg
    );
    Ok(())
}

fn handle_export(
    session: &Session,
    cmd: &ExportCommand,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let records = session.records()?;
    let filter = cmd.filter(config.default_filter());
    let csv = export_csv(&records, today, &filter)?;

    let path = cmd
        .output
        .clone()
        .unwrap_or_else(|| export_filename(&filter, today).into());
    std::fs::write(&path, &csv)?;
    println!("Wrote {} lines to {}", csv.lines().count(), path.display());
    Ok(())
}

fn handle_recommend(catalog: &Catalog, cmd: &RecommendCommand) -> Result<()> {
    let recommendations =
        catalog.recommendations_for(cmd.category.map(Into::into), cmd.difficulty.map(Into::into));

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No recommendations match the selected filters.");
        return Ok(());
    }

    println!(
        "{} recommendations, {:.2} kg CO₂e potential savings per year",
        recommendations.len(),
        total_potential_savings(&recommendations)
    );
    for rec in &recommendations {
        println!();
        println!("#{} {} ({}, {})", rec.id, rec.title, rec.category, rec.difficulty);
        println!("   {}", rec.description);
        println!(
            "   Saves about {:.0} kg CO₂e/year within {}",
            rec.potential_savings, rec.timeframe
        );
        for step in &rec.action_steps {
            println!("   - {step}");
        }
        for tip in &rec.tips {
            println!("   Tip: {tip}");
        }
    }
    Ok(())
}

fn handle_achievements(
    session: &Session,
    catalog: &Catalog,
    cmd: &AchievementsCommand,
) -> Result<()> {
    let user = session.current_user()?;
    let records = session.records()?;
    let statuses = evaluate_all(&catalog.achievements, user, &records);

    if cmd.format == OutputFormat::Json {
        let items: Vec<_> = catalog
            .achievements
            .iter()
            .zip(&statuses)
            .map(|(def, status)| {
                serde_json::json!({
                    "id": def.id,
                    "name": def.name,
                    "icon": def.icon,
                    "description": def.description,
                    "xp_reward": def.xp_reward,
                    "unlocked": status.unlocked,
                    "progress": status.progress,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let unlocked = statuses.iter().filter(|status| status.unlocked).count();
    println!("Achievements ({unlocked}/{} unlocked)", statuses.len());
    for (def, status) in catalog.achievements.iter().zip(&statuses) {
        println!();
        let marker = if status.unlocked { "x" } else { " " };
        println!("[{marker}] {} {}  (+{} XP)", def.icon, def.name, def.xp_reward);
        println!("    {}", def.description);
        if !status.unlocked {
            println!("    Progress: {:.0}%", status.progress * 100.0);
        }
    }
    Ok(())
}

fn handle_profile(session: &mut Session, cmd: ProfileCommand) -> Result<()> {
    let user = if cmd.is_update() {
        session.update_profile(cmd.name, cmd.email)?
    } else {
        session.current_user()?
    };

    if cmd.format == OutputFormat::Json {
        let profile = serde_json::json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "total_emissions": user.total_emissions,
            "achievements": user.achievements,
            "level": user.level,
            "xp": user.xp,
            "streak": user.streak,
            "joined_date": user.joined_date,
        });
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("{} <{}>", user.name, user.email);
    println!("Member since:    {}", user.joined_date);
    println!("Total emissions: {:.2} kg CO₂e", user.total_emissions);
    println!(
        "Level {} with {} XP, {} day streak",
        user.level, user.xp, user.streak
    );
    if !user.achievements.is_empty() {
        println!("Achievements:    {}", user.achievements.join(", "));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { format } => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:   {}", config.data_dir().display());
                println!("  Session file:     {}", config.session_path().display());
                println!();
                println!("[Catalog]");
                match config.catalog_path() {
                    Some(path) => println!("  Override file:    {}", path.display()),
                    None => println!("  Override file:    (built-in catalog)"),
                }
                println!();
                println!("[Report]");
                println!("  Default range:    {}", config.report.default_range);
                println!("  Default category: {}", config.report.default_category);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
