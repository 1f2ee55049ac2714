//! Manage chart products and instantiate `@{name}` charts.
//!
//! # Examples
//!
//! ```bash
//! # Catalog
//! helmkit product list
//! helmkit product --output json get nginx-ingress
//! helmkit product get-chart nginx-ingress
//!
//! # Placeholders used by a chart
//! helmkit product extract-vars ./charts/nginx
//!
//! # Render a product with values, failing on anything unassigned
//! helmkit product instantiate nginx-ingress ./out/nginx \
//!     --values prod.yaml --set image.tag=1.25,replicaCount=3 \
//!     --unassigned error --validate
//!
//! # Register a new product from an existing chart
//! helmkit product define nginx-ingress --base-chart-path ./charts/nginx \
//!     --description "Ingress controller"
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use super::common::{OutputFormat, render_structured, run_blocking, truncate};
use crate::constants::{DEFAULT_CHART_SUBDIR, DEFAULT_PRODUCTS_DIR};
use crate::product::{
    ChartInfo, Product, ProductManager, UnassignedPolicy, VariableDefinition,
    load_values_for_instantiation,
};
use crate::utils::fs::FileStore;
use crate::utils::platform::expand_path;

/// Width of the description column in `product list`.
const DESCRIPTION_WIDTH: usize = 45;

/// Command to manage chart products.
#[derive(Args, Debug)]
pub struct ProductCommand {
    /// Root directory holding product definitions
    #[arg(long, value_name = "DIR", default_value = DEFAULT_PRODUCTS_DIR)]
    products_dir: String,

    /// Output format for list, get, get-chart and extract-vars
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProductSubcommand {
    /// List all products
    List,

    /// Show a product's metadata
    Get {
        /// Product name
        name: String,
    },

    /// Show the Chart.yaml fields of a product's chart
    GetChart {
        /// Product name
        name: String,
    },

    /// List the `@{name}` placeholders used below a chart directory
    ExtractVars {
        /// Chart directory
        path: String,
    },

    /// Write a copy of a chart with every placeholder substituted
    ///
    /// Values come from `--values` files (YAML or JSON, nested keys become
    /// dotted names) and are overridden by `--set` pairs, applied in order.
    /// When the merged files name an `RDBMS_DB_CLIENT` with an entry under
    /// `database_configs`, that entry's keys are also available at the top level.
    Instantiate {
        /// Product name, or a chart directory
        name_or_path: String,

        /// Output directory
        output_path: String,

        /// YAML or JSON file with variable values; may be repeated, later files win
        #[arg(long, value_name = "FILE")]
        values: Vec<String>,

        /// Values as `key=value[,key=value...]`; may be repeated
        #[arg(long, value_name = "PAIRS")]
        set: Vec<String>,

        /// What to do with placeholders that have no value
        #[arg(long, value_enum, default_value_t = UnassignedPolicy::Empty)]
        unassigned: UnassignedPolicy,

        /// Validate the written YAML and JSON files afterwards
        #[arg(long)]
        validate: bool,
    },

    /// Check that every YAML and JSON file below a chart directory parses
    Validate {
        /// Chart directory
        path: String,
    },

    /// Define a new product from an existing chart directory
    Define {
        /// Name of the new product
        name: String,

        /// Chart directory to copy into the product
        #[arg(long, value_name = "DIR")]
        base_chart_path: String,

        /// Product description
        #[arg(long)]
        description: Option<String>,

        /// YAML or JSON list of variable definitions (name, description, default)
        ///
        /// Without it, variables are extracted from the chart.
        #[arg(long, value_name = "FILE")]
        variables_file: Option<String>,

        /// Sub-directory of the product directory that receives the chart
        #[arg(long, value_name = "DIR", default_value = DEFAULT_CHART_SUBDIR)]
        product_chart_subdir: String,
    },
}

impl ProductCommand {
    pub async fn execute(self) -> Result<()> {
        let products_dir = expand_path(&self.products_dir)?;
        let manager = ProductManager::local(&products_dir)?;
        let format = self.output;

        match self.command {
            ProductSubcommand::List => {
                let products =
                    run_blocking("product listing", move || manager.list_products()).await?;
                print_products(&products, format, &products_dir)
            }
            ProductSubcommand::Get { name } => {
                let product = run_blocking("product lookup", move || manager.get_product(&name))
                    .await?;
                print_product(&product, format)
            }
            ProductSubcommand::GetChart { name } => {
                let info = run_blocking("chart lookup", move || manager.get_chart_info(&name))
                    .await
                    .context("Failed to read chart information")?;
                print_chart_info(&info, format)
            }
            ProductSubcommand::ExtractVars { path } => {
                let path = expand_path(&path)?;
                let shown = path.clone();
                let vars = run_blocking("variable extraction", move || {
                    manager.extract_variables_from_path(&path)
                })
                .await
                .with_context(|| format!("Failed to extract variables from {}", shown.display()))?;
                print_variables(&vars, format, &shown)
            }
            ProductSubcommand::Instantiate {
                name_or_path,
                output_path,
                values,
                set,
                unassigned,
                validate,
            } => {
                let output_path = expand_path(&output_path)?;
                let values_files =
                    values.iter().map(|v| expand_path(v)).collect::<Result<Vec<_>>>()?;

                let written = run_blocking("instantiation", move || {
                    let files: Vec<&Path> = values_files.iter().map(|p| p.as_path()).collect();
                    let values = load_values_for_instantiation(manager.store(), &files, &set)?;
                    let written =
                        manager.instantiate_product(&name_or_path, &values, &output_path, unassigned)?;
                    if validate {
                        manager.validate_chart_files(&written)?;
                    }
                    Ok(written)
                })
                .await
                .context("Failed to instantiate chart")?;

                println!("{} Successfully instantiated chart to: {}", "✓".green(), written.display());
                if validate {
                    println!("{} Instantiated chart files are valid", "✓".green());
                }
                Ok(())
            }
            ProductSubcommand::Validate { path } => {
                let path = expand_path(&path)?;
                let shown = path.clone();
                run_blocking("chart validation", move || manager.validate_chart_files(&path))
                    .await?;
                println!("{} Chart at '{}' validated successfully.", "✓".green(), shown.display());
                Ok(())
            }
            ProductSubcommand::Define {
                name,
                base_chart_path,
                description,
                variables_file,
                product_chart_subdir,
            } => {
                let base_chart_path = expand_path(&base_chart_path)?;
                let variables_file = variables_file.as_deref().map(expand_path).transpose()?;

                let product = run_blocking("product definition", move || {
                    let variables = match variables_file {
                        Some(path) => read_variable_definitions(manager.store(), &path)?,
                        None => Vec::new(),
                    };
                    let meta = Product {
                        name: name.clone(),
                        description: description.filter(|d| !d.is_empty()),
                        chart_path: product_chart_subdir,
                        variables,
                    };
                    manager.define_product(&name, &base_chart_path, Some(meta))
                })
                .await
                .context("Failed to define product")?;

                println!(
                    "{} Successfully defined product '{}' in {}",
                    "✓".green(),
                    product.name,
                    products_dir.join(&product.name).display()
                );
                Ok(())
            }
        }
    }
}

/// Read a YAML (or JSON) list of variable definitions.
fn read_variable_definitions(
    store: &dyn FileStore,
    path: &Path,
) -> crate::core::Result<Vec<VariableDefinition>> {
    let text = store.read_to_string(path)?;
    serde_yaml::from_str(&text).or_else(|yaml_error| {
        serde_json::from_str(&text).map_err(|json_error| {
            crate::core::HelmkitError::parse_error(
                path.display(),
                format!("not a YAML ({yaml_error}) or JSON ({json_error}) list of variable definitions"),
            )
        })
    })
}

fn print_products(products: &[Product], format: OutputFormat, products_dir: &Path) -> Result<()> {
    if let Some(rendered) = render_structured(&products, format)? {
        println!("{rendered}");
        return Ok(());
    }

    if products.is_empty() {
        println!("No products found in {}.", products_dir.display());
        return Ok(());
    }

    println!("{:<30} {:<45} {}", "NAME".bold(), "DESCRIPTION".bold(), "CHART PATH".bold());
    for product in products {
        let description = product.description.as_deref().unwrap_or("");
        println!(
            "{:<30} {:<45} {}",
            product.name,
            truncate(description, DESCRIPTION_WIDTH),
            product.chart_path
        );
    }
    Ok(())
}

fn print_product(product: &Product, format: OutputFormat) -> Result<()> {
    if let Some(rendered) = render_structured(product, format)? {
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", "Name:".bold(), product.name);
    if let Some(description) = &product.description {
        println!("{} {}", "Description:".bold(), description);
    }
    println!("{} {}", "Chart Path:".bold(), product.chart_path);

    if product.variables.is_empty() {
        println!("{} none", "Variables:".bold());
    } else {
        println!("{}", "Variables:".bold());
        for variable in &product.variables {
            println!("  - {}", describe_variable(variable));
        }
    }
    Ok(())
}

fn print_chart_info(info: &ChartInfo, format: OutputFormat) -> Result<()> {
    if let Some(rendered) = render_structured(info, format)? {
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", "Name:".bold(), info.name);
    println!("{} {}", "Version:".bold(), info.version);
    if !info.api_version.is_empty() {
        println!("{} {}", "API Version:".bold(), info.api_version);
    }
    if let Some(app_version) = &info.app_version {
        println!("{} {}", "App Version:".bold(), app_version);
    }
    if let Some(description) = &info.description {
        println!("{} {}", "Description:".bold(), description);
    }
    Ok(())
}

fn print_variables(vars: &[VariableDefinition], format: OutputFormat, path: &Path) -> Result<()> {
    if let Some(rendered) = render_structured(&vars, format)? {
        println!("{rendered}");
        return Ok(());
    }

    if vars.is_empty() {
        println!("No variables found in {}.", path.display());
        return Ok(());
    }

    println!("{}", "Found Variables:".bold());
    for variable in vars {
        println!("  - {}", describe_variable(variable));
    }
    Ok(())
}

fn describe_variable(variable: &VariableDefinition) -> String {
    let mut line = variable.name.clone();
    if let Some(description) = &variable.description {
        line.push_str(&format!(": {description}"));
    }
    if let Some(default) = &variable.default {
        line.push_str(&format!(" (default: {default})"));
    }
    line
}

