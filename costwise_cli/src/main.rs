//! # Costwise CLI Application
//!
//! Terminal front end for quick what-if runs of the pricing engine:
//! enter a product cost and the business numbers, get the suggested
//! price, margins, and break-even picture.

use std::io::{self, BufRead, Write};

use costwise_core::business::Business;
use costwise_core::costs::{CostCategory, CostFrequency, CostItem};
use costwise_core::engine;
use costwise_core::products::Product;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Costwise CLI - Food Business Pricing Calculator");
    println!("===============================================");
    println!();

    let unit_cost = prompt_f64("Product unit cost [4.0]: ", 4.0);
    let client_price = prompt_f64("Your selling price (0 = use suggestion) [0]: ", 0.0);
    let fixed_costs = prompt_f64("Monthly fixed costs [1000.0]: ", 1000.0);
    let capacity = prompt_f64("Units you can sell per month [500]: ", 500.0);

    let mut business = Business::new("CLI Demo", "Demo Business");
    business.settings.monthly_capacity = capacity;

    let product_id = match business.add_product(Product::new_resale("Demo product", unit_cost)) {
        Ok(id) => id,
        Err(e) => return print_error(&e),
    };
    if client_price > 0.0 {
        if let Err(e) = business.update_client_price(product_id, client_price) {
            return print_error(&e);
        }
    }
    let fixed = CostItem::new(
        "Fixed costs",
        fixed_costs,
        CostFrequency::Monthly,
        CostCategory::Other,
    );
    if let Err(e) = business.add_fixed_cost(fixed) {
        return print_error(&e);
    }

    let record = match engine::compute_product_pricing(&business, product_id) {
        Ok(record) => record,
        Err(e) => return print_error(&e),
    };

    println!();
    println!("═══════════════════════════════════════");
    println!("  PRICING");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Cost total:       {:.2}", record.cost_total);
    println!(
        "  Suggested price:  {:.2} ({:.0}% margin on cost)",
        record.suggested_price, business.settings.margin_percent
    );
    println!("  Selling price:    {:.2}", record.client_price);
    println!("  Margin:           {:.2}%", record.margin_real);
    println!(
        "  Profit per unit:  {:.2} {}",
        record.profit_per_unit,
        status_icon(record.is_profitable())
    );

    println!();
    println!("═══════════════════════════════════════");
    println!("  BREAK-EVEN");
    println!("═══════════════════════════════════════");
    println!();

    match engine::compute_break_even(&business, None) {
        Ok(result) => {
            if result.is_achievable() {
                println!("  Contribution margin: {:.2}/unit", result.contribution_margin);
                println!("  Break-even volume:   {:.0} units/month", result.break_even_units);
                println!("  Break-even revenue:  {:.2}", result.break_even_revenue);
                println!("  Margin of safety:    {:.2}%", result.margin_of_safety_pct);
                println!("  Profit at capacity:  {:.2}/month", result.monthly_profit);
                println!("  Annual ROI:          {:.2}%", result.annual_roi_pct);
                println!();
                println!(
                    "  RESULT: {}",
                    if result.margin_of_safety_pct > 0.0 {
                        "viable at this capacity"
                    } else {
                        "break-even exceeds capacity"
                    }
                );
            } else {
                println!("  Selling price does not cover the variable cost.");
                println!("  No sales volume reaches break-even at these numbers.");
            }

            println!();
            println!("JSON Output (for API/LLM use):");
            if let Ok(json) = serde_json::to_string_pretty(&record) {
                println!("{}", json);
            }
        }
        Err(e) => print_error(&e),
    }
}

fn print_error(e: &costwise_core::EngineError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[LOSS]"
    }
}
