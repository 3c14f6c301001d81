use crate::catalog::{match_platforms, triggers, Category};
use crate::ui::Output;

/// Show the booking platforms a query would surface, without any network call
pub fn platforms(query: &str) {
    let output = Output::new();
    let matches = match_platforms(query);

    if matches.is_empty() {
        output.info("No booking platforms matched. Keywords per category:");
        for category in Category::ALL {
            output.info(&format!(
                "{} {}: {}",
                category.icon(),
                category.name(),
                triggers(category).join(", ")
            ));
        }
        return;
    }

    output.platform_suggestions(&matches);
}
