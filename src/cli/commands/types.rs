//! Document type listing.

use console::style;

use crate::models::KnowledgeType;

/// Print the catalog.
pub fn cmd_types(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(KnowledgeType::all())?);
        return Ok(());
    }

    for t in KnowledgeType::all() {
        println!("{} {}", style(t.id).cyan().bold(), style(t.title).bold());
        println!("  {}", style(t.description).dim());
        for element in t.elements {
            println!("  - {}", element);
        }
        println!();
    }
    Ok(())
}
