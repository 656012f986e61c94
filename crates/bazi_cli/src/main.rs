use std::path::PathBuf;

use bazi_base::{Element, Layer};
use bazi_calendar::{CalendarOracle, Sex, SolarTermCalendar};
use bazi_config::BaziConfig;
use bazi_engine::{
    CycleRecord, Event, LuckAnalysis, NatalAnalysis, YearRecord, analyze_complete, analyze_luck,
    analyze_natal, chart_from_raw,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bazi", about = "BaZi chart and luck-timeline risk analysis")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(s: SexArg) -> Self {
        match s {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Text,
}

#[derive(clap::Args)]
struct Birth {
    /// Local civil birth date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Local civil birth time (HH:MM)
    #[arg(long, default_value = "12:00")]
    time: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Natal chart: strength, useful elements, ten gods, natal relations
    Chart {
        #[command(flatten)]
        birth: Birth,
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Luck cycles and scored years
    Luck {
        #[command(flatten)]
        birth: Birth,
        #[arg(long, value_enum)]
        sex: SexArg,
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// One scored calendar year with all its events
    Year {
        #[command(flatten)]
        birth: Birth,
        #[arg(long, value_enum)]
        sex: SexArg,
        /// Calendar year to show
        #[arg(long)]
        year: i32,
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Natal analysis and the full luck timeline
    Analyze {
        #[command(flatten)]
        birth: Birth,
        #[arg(long, value_enum)]
        sex: SexArg,
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = BaziConfig::load_or_default(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        std::process::exit(1);
    });
    init_tracing(&config.log.level);
    debug!(?config, "configuration");

    let calendar = config.calendar().unwrap_or_else(|e| {
        eprintln!("Invalid calendar settings: {e}");
        std::process::exit(1);
    });
    let options = config.luck_options();

    match cli.command {
        Commands::Chart { birth, format } => {
            let natal = natal_for(&calendar, require_birth(&birth));
            match format {
                Format::Json => print_json(&natal),
                Format::Text => print_natal_text(&natal),
            }
        }

        Commands::Luck { birth, sex, format } => {
            let at = require_birth(&birth);
            let natal = natal_for(&calendar, at);
            let useful = &natal.useful.final_elements;
            let luck = analyze_luck(&calendar, at, sex.into(), useful, &options)
                .unwrap_or_else(|e| fail("Luck analysis failed", e));
            match format {
                Format::Json => print_json(&luck),
                Format::Text => print_luck_text(&luck),
            }
        }

        Commands::Year {
            birth,
            sex,
            year,
            format,
        } => {
            let at = require_birth(&birth);
            let natal = natal_for(&calendar, at);
            let useful = &natal.useful.final_elements;
            let luck = analyze_luck(&calendar, at, sex.into(), useful, &options)
                .unwrap_or_else(|e| fail("Luck analysis failed", e));
            let Some(record) = luck.year(year) else {
                eprintln!("Year {year} is outside the luck timeline");
                std::process::exit(1);
            };
            match format {
                Format::Json => print_json(record),
                Format::Text => print_year_text(record, true),
            }
        }

        Commands::Analyze { birth, sex, format } => {
            let at = require_birth(&birth);
            let analysis = analyze_complete(&calendar, at, sex.into(), &options)
                .unwrap_or_else(|e| fail("Analysis failed", e));
            match format {
                Format::Json => print_json(&analysis),
                Format::Text => {
                    print_natal_text(&analysis.natal);
                    println!();
                    print_luck_text(&analysis.luck);
                }
            }
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {e}");
    std::process::exit(1);
}

fn require_birth(birth: &Birth) -> NaiveDateTime {
    let date = NaiveDate::parse_from_str(&birth.date, "%Y-%m-%d")
        .unwrap_or_else(|e| fail(&format!("Invalid date {:?}", birth.date), e));
    let time = NaiveTime::parse_from_str(&birth.time, "%H:%M")
        .unwrap_or_else(|e| fail(&format!("Invalid time {:?}", birth.time), e));
    date.and_time(time)
}

fn natal_for(calendar: &SolarTermCalendar, at: NaiveDateTime) -> NatalAnalysis {
    let raw = calendar
        .natal_pillars(at)
        .unwrap_or_else(|e| fail("Calendar conversion failed", e));
    let chart = chart_from_raw(&raw).unwrap_or_else(|e| fail("Invalid natal chart", e));
    analyze_natal(&chart)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail("Failed to encode JSON", e),
    }
}

fn elements(list: &[Element]) -> String {
    list.iter().map(|e| e.name()).collect::<Vec<_>>().join("")
}

fn flag(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn print_natal_text(natal: &NatalAnalysis) {
    println!("Chart: {}", natal.chart);
    println!(
        "Day master: {} ({})",
        natal.day_master,
        natal.day_master.element().name()
    );
    println!(
        "Strength: {:.1}% (support {:.1}%, drain {:.1}%)",
        natal.strength.strength_percent,
        natal.strength.support_percent,
        natal.strength.drain_percent
    );
    let dist: Vec<String> = natal
        .element_distribution
        .iter()
        .map(|s| format!("{} {:.1}%", s.element.name(), s.percent))
        .collect();
    println!("Elements: {}", dist.join(", "));
    println!(
        "Useful: {} (base {})",
        elements(&natal.useful.final_elements),
        elements(&natal.useful.base)
    );
    for rule in &natal.useful.special_rules {
        println!("  rule: {}", rule.id());
    }
    for t in &natal.traits {
        println!("  {} {:.1}% {}", t.category.name(), t.total_percent, t.mix_label);
    }
    for c in &natal.conflicts.clashes {
        println!("  clash {} -> {} ({:.1}%)", c.flow.branch, c.target_branch, c.risk_percent);
    }
    for p in &natal.conflicts.punishments {
        println!(
            "  punishment {} -> {} {} ({:.1}%)",
            p.flow.branch,
            p.target_branch,
            p.target.pillar.key(),
            p.risk_percent
        );
    }
    println!("Natal punishment risk: {:.1}%", natal.punishment_risk_percent);
}

fn print_cycle_text(cycle: &CycleRecord) {
    println!(
        "{}{} from {} (age {}): {} risk {:.1}% (stem {:.1}, branch {:.1}), years avg {:.1}%",
        cycle.stem,
        cycle.branch,
        cycle.start_year,
        cycle.start_age,
        cycle.label.name(),
        cycle.risk_total,
        cycle.risk_stem,
        cycle.risk_branch,
        cycle.average_year_risk
    );
}

fn print_year_text(year: &YearRecord, with_events: bool) {
    let halves = year
        .half_labels
        .map(|h| format!(" [{} / {}]", h.first_half.name(), h.second_half.name()))
        .unwrap_or_default();
    println!(
        "  {} {}{} age {:>3}: {:>5.1}% (stem {:.1}, branch {:.1}) {}{}{}",
        year.year,
        year.stem,
        year.branch,
        year.age,
        year.total_risk,
        year.stem_side_risk,
        year.branch_side_risk,
        year.year_label.name(),
        halves,
        if year.risk_management { " !" } else { "" }
    );
    if !with_events {
        return;
    }
    println!(
        "    useful stem {} branch {}, good {}",
        flag(year.stem_is_useful),
        flag(year.branch_is_useful),
        flag(year.is_good)
    );
    for e in &year.all_events {
        let side = match e.side() {
            Layer::Stem => "stem",
            Layer::Branch => "branch",
        };
        match e {
            Event::Harmony(h) => println!("    harmony {:?} {:?}", h.kind, h.members),
            _ => println!("    {} [{side}] {:.1}%", e.kind(), e.risk_percent()),
        }
    }
}

fn print_luck_text(luck: &LuckAnalysis) {
    for group in &luck.groups {
        print_cycle_text(&group.cycle);
        for year in &group.years {
            print_year_text(year, false);
        }
    }
    for tp in &luck.turning_points {
        println!(
            "Turning point {} at {}: branch useful {} -> {}",
            tp.ganzhi,
            tp.year,
            flag(tp.from_useful),
            flag(tp.to_useful)
        );
    }
}
