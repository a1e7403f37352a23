//! `dint params` command - parameter space catalog and resolution

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{
    assignments_map, effective_format, load_catalog, load_engine, parse_assignment,
    print_structured, truncate_str,
};
use crate::cli::GlobalOpts;
use crate::codegen::ParameterResolver;
use crate::core::{format_number, Config, ParamValue, ParameterAssignment, ParameterSpace};

#[derive(Subcommand, Debug)]
pub enum ParamsCommands {
    /// List the available parameter spaces
    List,

    /// Show a space's parameters and dependency graph
    Show(SpaceArgs),

    /// Resolve a space with assignments into code
    Resolve(AssignArgs),

    /// Print an unresolved scaffold with {{name}} placeholders
    Template(SpaceArgs),

    /// Print the assignment as a C# dictionary initializer
    Dict(AssignArgs),
}

#[derive(clap::Args, Debug)]
pub struct SpaceArgs {
    /// Parameter space name
    pub space: String,
}

#[derive(clap::Args, Debug)]
pub struct AssignArgs {
    /// Parameter space name
    pub space: String,

    /// Assignment as key=value (repeatable)
    #[arg(long = "set", short = 's', value_parser = parse_assignment)]
    pub set: Vec<(String, ParamValue)>,
}

#[derive(Debug, Serialize)]
struct SpaceSummary<'a> {
    name: &'a str,
    description: &'a str,
    parameters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SpaceView<'a> {
    #[serde(flatten)]
    space: &'a ParameterSpace,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<Vec<String>>,
}

pub fn run(cmd: ParamsCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        ParamsCommands::List => run_list(global, config),
        ParamsCommands::Show(args) => run_show(args, global, config),
        ParamsCommands::Resolve(args) => run_resolve(args, global, config),
        ParamsCommands::Template(args) => {
            let catalog = load_catalog(config)?;
            let space = catalog.get_space(&args.space)?;
            println!("{}", ParameterResolver::new().generate_from_space(space));
            Ok(())
        }
        ParamsCommands::Dict(args) => {
            let catalog = load_catalog(config)?;
            let space = catalog.get_space(&args.space)?;
            let mut assignment = ParameterAssignment::with_defaults(space)?;
            for (name, value) in &args.set {
                assignment.set(name, value.clone())?;
            }
            println!("{}", assignment.to_csharp_dict());
            Ok(())
        }
    }
}

fn run_list(global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let summaries: Vec<SpaceSummary<'_>> = catalog
        .iter()
        .map(|entry| SpaceSummary {
            name: &entry.space.name,
            description: &entry.space.description,
            parameters: entry.space.len(),
            template: entry.template.as_deref(),
        })
        .collect();

    if print_structured(&summaries, effective_format(global, config))? {
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Space", "Params", "Resolves via", "Description"]);
    for summary in &summaries {
        builder.push_record([
            summary.name.to_string(),
            summary.parameters.to_string(),
            summary.template.map_or_else(|| "domain blocks".to_string(), str::to_string),
            truncate_str(summary.description, 48),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    if !global.quiet {
        println!();
        println!("{} space(s) found", style(summaries.len()).cyan());
    }
    Ok(())
}

fn run_show(args: SpaceArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let space = catalog.get_space(&args.space)?;
    let template = catalog.get(&args.space).and_then(|e| e.template.as_deref());
    let cycle = space.find_cycle();

    let view = SpaceView {
        space,
        template,
        cycle: cycle.clone(),
    };
    if print_structured(&view, effective_format(global, config))? {
        return Ok(());
    }

    println!("{} {}", style(&space.name).bold(), style(&space.description).dim());
    if let Some(template) = template {
        println!("Template: {}", template);
    }
    println!();

    let mut builder = Builder::default();
    builder.push_record(["Name", "Type", "Domain", "Default", "Accepts", "Unit", "Tolerance"]);
    for param in space.parameters() {
        let tolerance = match (param.tolerance_plus, param.tolerance_minus) {
            (Some(plus), Some(minus)) => format!("+{} / {}", format_number(plus), format_number(minus)),
            _ => String::new(),
        };
        builder.push_record([
            param.name.clone(),
            param.parameter_type.to_string(),
            param.domain.to_string(),
            param.default_value.to_string(),
            param.bounds_label(),
            param.unit.clone(),
            tolerance,
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    let edges: Vec<(String, String)> = space
        .dependency_graph()
        .into_iter()
        .flat_map(|(name, deps)| deps.into_iter().map(move |dep| (dep, name.clone())))
        .collect();
    if !edges.is_empty() {
        println!();
        println!("Dependencies:");
        for (from, to) in &edges {
            println!("  {} {} {}", from, style("->").dim(), to);
        }
    }

    if let Some(cycle) = cycle {
        println!();
        println!(
            "{} Dependency cycle: {}",
            style("!").yellow().bold(),
            cycle.join(" -> ")
        );
    }
    Ok(())
}

fn run_resolve(args: AssignArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let engine = load_engine(config)?;
    let assignments = assignments_map(&args.set);

    let resolution =
        ParameterResolver::new().resolve_request(&catalog, &engine, &args.space, &assignments)?;

    if print_structured(&resolution, effective_format(global, config))? {
        return Ok(());
    }

    println!("{}", resolution.code);

    if !global.quiet {
        eprintln!();
        eprintln!("{}", style("Assignments used:").bold());
        for (name, value) in &resolution.assignments_used {
            eprintln!("  {} = {}", name, value);
        }
    }
    for error in &resolution.validation_errors {
        eprintln!("{} {}", style("✗").red(), error);
    }
    Ok(())
}
