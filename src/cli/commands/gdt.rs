//! `dint gdt` command - GD&T callout parsing, checking and code generation

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, print_structured};
use crate::cli::GlobalOpts;
use crate::codegen::GdtCodeGenerator;
use crate::core::{format_number, Config};
use crate::entities::gdt::GdtSpecification;
use crate::normalize::GdtNormalizer;

#[derive(Subcommand, Debug)]
pub enum GdtCommands {
    /// Parse a callout and show the normalized frame
    Parse(ParseArgs),

    /// Check a callout against the ASME Y14.5 rules (non-zero exit on violation)
    Check(CheckArgs),

    /// Generate feature control frame code
    Code(CodeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Callout text, e.g. "position DIA 0.25 MMC A B C"
    pub text: String,

    /// Feature size, to report the virtual condition
    #[arg(long)]
    pub size: Option<f64>,

    /// Treat the feature as internal (hole) instead of external (pin)
    #[arg(long, requires = "size")]
    pub internal: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Callout text
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct CodeArgs {
    /// Callout text
    pub text: String,

    /// Emit a composite frame with this refinement tolerance
    #[arg(long)]
    pub refine: Option<f64>,

    /// Print the instruction/code training pair
    #[arg(long)]
    pub pair: bool,
}

#[derive(Debug, Serialize)]
struct ParseView<'a> {
    specification: &'a GdtSpecification,
    valid: bool,
    validation_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    virtual_condition: Option<f64>,
}

pub fn run(cmd: GdtCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        GdtCommands::Parse(args) => run_parse(args, global, config),
        GdtCommands::Check(args) => run_check(args, global),
        GdtCommands::Code(args) => run_code(args, global, config),
    }
}

fn run_parse(args: ParseArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let normalizer = GdtNormalizer::new();
    let spec = normalizer.normalize(&args.text)?;
    let errors = normalizer.validate_specification(&spec);
    let virtual_condition = args
        .size
        .and_then(|size| normalizer.calculate_virtual_condition(&spec, size, !args.internal));

    let view = ParseView {
        specification: &spec,
        valid: errors.is_empty(),
        validation_errors: errors,
        virtual_condition,
    };
    if print_structured(&view, effective_format(global, config))? {
        return Ok(());
    }

    println!("{}", style(spec.to_string()).bold());
    println!(
        "  Characteristic: {} ({})",
        style(spec.characteristic).cyan(),
        spec.characteristic.category()
    );
    println!("  Tolerance:      {}", format_number(spec.tolerance_value));
    println!("  Zone:           {} ({})", spec.tolerance_zone_shape, spec.applies_to);
    println!(
        "  Modifier:       {}",
        spec.material_modifier
            .map(|m| m.to_string())
            .unwrap_or_else(|| "RFS".to_string())
    );
    let datums: Vec<String> = spec.datum_references.iter().map(|d| d.to_string()).collect();
    println!(
        "  Datums:         {}",
        if datums.is_empty() { "none".to_string() } else { datums.join(" | ") }
    );
    if let Some(size) = args.size {
        let side = if args.internal { "internal" } else { "external" };
        match view.virtual_condition {
            Some(vc) => println!(
                "  Virtual cond.:  {} ({} feature, size {})",
                format_number(vc),
                side,
                format_number(size)
            ),
            None => println!("  Virtual cond.:  n/a at RFS"),
        }
    }

    println!();
    print_rule_report(&view.validation_errors);
    Ok(())
}

fn run_check(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let normalizer = GdtNormalizer::new();
    let spec = normalizer.normalize(&args.text)?;
    let errors = normalizer.validate_specification(&spec);

    if !global.quiet {
        print_rule_report(&errors);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(miette::miette!("Check failed: 1 rule violated")),
        n => Err(miette::miette!("Check failed: {} rules violated", n)),
    }
}

fn run_code(args: CodeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut spec = GdtNormalizer::new().normalize(&args.text)?;
    if let Some(refinement) = args.refine {
        spec = spec.with_composite(refinement);
    }

    let generator = GdtCodeGenerator::new();
    let generated = generator.generate(&spec);
    for warning in &generated.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let format = effective_format(global, config);
    if args.pair {
        let pair = generator.training_pair(&spec);
        if !print_structured(&pair, format)? {
            println!("// {}", pair.instruction);
            print!("{}", pair.code);
        }
    } else if !print_structured(&generated, format)? {
        print!("{}", generated.code);
    }
    Ok(())
}

fn print_rule_report(errors: &[String]) {
    if errors.is_empty() {
        println!("{} Valid per ASME Y14.5", style("✓").green().bold());
        return;
    }
    for error in errors {
        println!("{} {}", style("✗").red(), error);
    }
}
