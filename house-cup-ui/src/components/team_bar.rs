//! Team Bar Component
//!
//! One team's row: icon, name, and a bar whose width is the team's share of
//! the leading score.

use leptos::*;

use house_cup::BarRow;

/// Inline style for the filled part of a bar
pub fn bar_style(percent: u8) -> String {
    format!("width: {}%; transition: width 0.5s ease;", percent.min(100))
}

/// Team bar component
#[component]
pub fn TeamBar(
    /// Row to display; the element stays mounted so width changes animate
    #[prop(into)]
    row: Signal<BarRow>,
) -> impl IntoView {
    let team = row.with_untracked(|r| r.team);

    view! {
        <div class="flex items-center space-x-3">
            <span
                class="flex items-center space-x-2 w-24 cursor-default"
                title=move || row.with(|r| r.tooltip.clone())
            >
                <span class="text-2xl w-8 text-center">{team.icon}</span>
                <span class="font-medium text-gray-300">{team.name}</span>
            </span>

            <div class="flex-1 bg-gray-700 rounded-full h-7 overflow-hidden">
                <div
                    class="h-full bg-indigo-500 rounded-full flex items-center justify-end px-2"
                    style=move || row.with(|r| bar_style(r.percent))
                >
                    <span class="text-xs font-semibold tabular-nums">
                        {move || row.with(|r| r.score_label.clone())}
                    </span>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_style() {
        assert_eq!(bar_style(75), "width: 75%; transition: width 0.5s ease;");
        assert_eq!(bar_style(0), "width: 0%; transition: width 0.5s ease;");
        assert_eq!(bar_style(250), "width: 100%; transition: width 0.5s ease;");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use house_cup::{bar_rows, TotalsSnapshot};
    use std::collections::HashMap;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_tooltip_on_team_label() {
        let totals = HashMap::from([("Gryff".to_string(), 1200), ("Huff".to_string(), 300)]);
        let row = bar_rows(&TotalsSnapshot::from_totals(totals))[0].clone();

        let document = leptos::document();
        let root = document
            .create_element("div")
            .unwrap()
            .unchecked_into::<web_sys::HtmlElement>();
        document.body().unwrap().append_child(&root).unwrap();

        leptos::mount_to(root.clone(), move || {
            let row = row.clone();
            view! { <TeamBar row=Signal::derive(move || row.clone()) /> }
        });

        let titled = root.query_selector_all("[title]").unwrap();
        assert_eq!(titled.length(), 1);

        let label = root.query_selector("[title]").unwrap().unwrap();
        assert_eq!(label.get_attribute("title").as_deref(), Some("Gryff: 1,200"));
        let text = label.text_content().unwrap_or_default();
        assert!(text.contains("🦁"));
        assert!(text.contains("Gryff"));
    }
}
