//! `dint sketch` command - sketch constraints, dimensions and DOF checks

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::codegen::SketchCodeGenerator;
use crate::core::{format_number, Config, DimensionKind};
use crate::entities::sketch::SketchConstraint;
use crate::normalize::SketchConstraintNormalizer;

#[derive(Subcommand, Debug)]
pub enum SketchCommands {
    /// Parse a constraint phrase
    Parse(ParseArgs),

    /// Generate code for a constraint phrase
    Code(CodeArgs),

    /// Count degrees of freedom left by a set of constraints
    Dof(DofArgs),

    /// Generate code that adds a dimension
    Dim(DimArgs),
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Constraint phrase, e.g. "line L1 is horizontal"
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct CodeArgs {
    /// Constraint phrase
    pub text: String,

    /// Print the instruction/code training pair
    #[arg(long)]
    pub pair: bool,
}

#[derive(clap::Args, Debug)]
pub struct DofArgs {
    /// Number of sketch entities
    #[arg(long, short = 'e')]
    pub entities: u32,

    /// Constraint phrases
    #[arg(required = true)]
    pub constraints: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct DimArgs {
    /// Name of the dimensioned entity
    pub entity: String,

    /// Dimension kind (distance, angle, radius, diameter)
    pub kind: DimensionKind,

    /// Nominal value
    pub value: f64,

    /// Upper tolerance
    #[arg(long, requires = "minus", allow_hyphen_values = true)]
    pub plus: Option<f64>,

    /// Lower tolerance (sign is ignored)
    #[arg(long, requires = "plus", allow_hyphen_values = true)]
    pub minus: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DimView<'a> {
    entity: &'a str,
    kind: DimensionKind,
    value: f64,
    code: String,
}

pub fn run(cmd: SketchCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let format = effective_format(global, config);
    match cmd {
        SketchCommands::Parse(args) => {
            let constraint = SketchConstraintNormalizer::new().normalize(&args.text)?;
            if !print_structured(&constraint, format)? {
                print_constraint(&constraint);
            }
            Ok(())
        }
        SketchCommands::Code(args) => run_code(args, format),
        SketchCommands::Dof(args) => run_dof(args, format),
        SketchCommands::Dim(args) => {
            let code = SketchCodeGenerator::new().generate_dimension(
                &args.entity,
                args.kind,
                args.value,
                args.plus,
                args.minus,
            );
            let view = DimView {
                entity: &args.entity,
                kind: args.kind,
                value: args.value,
                code,
            };
            if !print_structured(&view, format)? {
                print!("{}", view.code);
            }
            Ok(())
        }
    }
}

fn run_code(args: CodeArgs, format: OutputFormat) -> Result<()> {
    let constraint = SketchConstraintNormalizer::new().normalize(&args.text)?;
    let generator = SketchCodeGenerator::new();

    if args.pair {
        let pair = generator
            .training_pair(&constraint)
            .map_err(|e| miette::miette!("{}", e))?;
        if !print_structured(&pair, format)? {
            println!("// {}", pair.instruction);
            print!("{}", pair.code);
        }
        return Ok(());
    }

    let code = generator
        .generate_constraint(&constraint)
        .map_err(|e| miette::miette!("{}", e))?;
    if !print_structured(&serde_json::json!({ "code": code }), format)? {
        print!("{}", code);
    }
    Ok(())
}

fn run_dof(args: DofArgs, format: OutputFormat) -> Result<()> {
    let normalizer = SketchConstraintNormalizer::new();
    let constraints = args
        .constraints
        .iter()
        .map(|text| normalizer.normalize(text))
        .collect::<Result<Vec<_>, _>>()?;
    let report = SketchConstraintNormalizer::check_fully_defined(&constraints, args.entities);

    if print_structured(&report, format)? {
        return Ok(());
    }

    for constraint in &constraints {
        println!("  {} {}", style("•").dim(), constraint);
    }
    println!();
    println!(
        "DOF: {} total, {} consumed, {} remaining",
        report.dof_total, report.dof_consumed, report.dof_remaining
    );
    if report.is_fully_defined {
        println!("{} Sketch is fully defined", style("✓").green().bold());
    } else {
        println!(
            "{} Sketch is under-defined ({} DOF remaining)",
            style("!").yellow().bold(),
            report.dof_remaining
        );
    }
    Ok(())
}

fn print_constraint(constraint: &SketchConstraint) {
    println!("{}", style(constraint.to_string()).bold());
    println!("  Kind:      {}", style(constraint.kind).cyan());
    println!("  Entity 1:  {}", constraint.entity1);
    if let Some(other) = &constraint.entity2 {
        println!("  Entity 2:  {}", other);
    }
    if let Some(reference) = &constraint.reference_entity {
        println!("  Reference: {}", reference);
    }
    if let Some(value) = constraint.value {
        println!("  Value:     {}", format_number(value));
    }
    println!("  DOF used:  {}", constraint.kind.dof_consumed());
}
