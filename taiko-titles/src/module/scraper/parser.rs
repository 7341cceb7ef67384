///! Title list HTML parser
///!
///! Walks a fixed chain of wiki containers down to the title table. The chain
///! and the style heuristics below mirror the current wiki markup; any layout
///! change upstream makes the table disappear and the page parses to zero rows.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::warn;

use crate::error::{Result, TitleError};

const TABLE_BODY_PATH: &str = "div.container-wrapper div#contents div.column-center.clearfix \
     div#body div#content div.h-scrollable table tbody";

static BACKGROUND_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"background-color:\s*([^;]+)").expect("valid regex"));

/// One title row as read from the wiki, before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedTitle {
    pub name: String,
    pub available: bool,
    pub rarity_color: String,
    pub obtain_condition: String,
    pub tips: String,
}

/// Result of parsing one page
#[derive(Debug, Clone, Default)]
pub struct ScrapedPage {
    /// Number of `tr` elements found under the table body
    pub row_count: usize,
    pub titles: Vec<ScrapedTitle>,
    /// Rows that looked like data but failed extraction
    pub skipped: usize,
}

/// Retired titles are greyed out in the first cell
fn parse_availability(style: &str) -> bool {
    !style.contains("grey")
}

/// `background-color: #ded523;` → `#ded523`, empty when absent
fn parse_rarity_color(style: &str) -> String {
    BACKGROUND_COLOR
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Text of a cell with every text node trimmed and joined without separator
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TitleError::Parse(format!("invalid selector '{}': {}", css, e)))
}

/// Extract one row. `Ok(None)` for rows too short to be titles.
fn parse_row(index: usize, row: &ElementRef<'_>, td: &Selector) -> Result<Option<ScrapedTitle>> {
    let cells: Vec<ElementRef<'_>> = row.select(td).collect();
    if cells.len() < 3 {
        return Ok(None);
    }

    let available = parse_availability(cells[0].value().attr("style").unwrap_or(""));
    let rarity_color = parse_rarity_color(cells[1].value().attr("style").unwrap_or(""));

    let name = cell_text(&cells[2]);
    if name.is_empty() {
        return Err(TitleError::RowParse {
            row: index,
            reason: "empty title name".to_string(),
        });
    }

    let obtain_condition = cells.get(3).map(cell_text).unwrap_or_default();
    let tips = cells.get(4).map(cell_text).unwrap_or_default();

    Ok(Some(ScrapedTitle {
        name,
        available,
        rarity_color,
        obtain_condition,
        tips,
    }))
}

/// Parse the wiki title list page into rows
pub fn parse_titles_html(html: &str) -> Result<ScrapedPage> {
    let document = Html::parse_document(html);

    let tbody_sel = selector(TABLE_BODY_PATH)?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;

    let Some(tbody) = document.select(&tbody_sel).next() else {
        warn!("Title table not found; the wiki layout may have changed");
        return Ok(ScrapedPage::default());
    };

    let mut page = ScrapedPage::default();
    for (idx, row) in tbody.select(&tr_sel).enumerate() {
        page.row_count += 1;
        match parse_row(idx + 1, &row, &td_sel) {
            Ok(Some(title)) => page.titles.push(title),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping row {}: {}", idx + 1, e);
                page.skipped += 1;
            }
        }
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_table(rows: &str) -> String {
        format!(
            r#"<html><body>
            <div class="container-wrapper"><div id="contents">
              <div class="column-center clearfix"><div id="body"><div id="content">
                <div class="h-scrollable"><table><tbody>{}</tbody></table></div>
              </div></div></div>
            </div></div>
            </body></html>"#,
            rows
        )
    }

    #[test]
    fn test_parse_rarity_color() {
        assert_eq!(parse_rarity_color("background-color: #ded523;"), "#ded523");
        assert_eq!(parse_rarity_color("width:10px;background-color:gold"), "gold");
        assert_eq!(parse_rarity_color("background-color:  #C0C0C0 ; color:red"), "#C0C0C0");
        assert_eq!(parse_rarity_color("color: red"), "");
    }

    #[test]
    fn test_parse_availability() {
        assert!(parse_availability(""));
        assert!(parse_availability("background-color:white"));
        assert!(!parse_availability("background-color:lightgrey"));
        assert!(!parse_availability("color:grey;"));
    }

    #[test]
    fn test_parse_full_rows() {
        let html = wrap_table(
            r#"
            <tr><td style="background-color:lightgrey"></td><td style="background-color:#ded523;"></td>
                <td> 太鼓の達人 </td><td>おにで<b>フルコンボ</b>を達成</td><td>期間限定</td></tr>
            <tr><td></td><td style="background-color: gold"></td><td>月下打人</td><td>条件</td></tr>
            <tr><td></td><td></td><td>名前だけ</td></tr>
            "#,
        );
        let page = parse_titles_html(&html).unwrap();
        assert_eq!(page.row_count, 3);
        assert_eq!(page.skipped, 0);
        assert_eq!(page.titles.len(), 3);

        let first = &page.titles[0];
        assert!(!first.available);
        assert_eq!(first.rarity_color, "#ded523");
        assert_eq!(first.name, "太鼓の達人");
        assert_eq!(first.obtain_condition, "おにでフルコンボを達成");
        assert_eq!(first.tips, "期間限定");

        let second = &page.titles[1];
        assert!(second.available);
        assert_eq!(second.rarity_color, "gold");
        assert_eq!(second.tips, "");

        let third = &page.titles[2];
        assert_eq!(third.rarity_color, "");
        assert_eq!(third.obtain_condition, "");
    }

    #[test]
    fn test_short_rows_skipped_and_bad_rows_counted() {
        let html = wrap_table(
            r#"
            <tr><th>header</th></tr>
            <tr><td>a</td><td>b</td></tr>
            <tr><td></td><td></td><td>   </td><td>no name</td></tr>
            <tr><td></td><td></td><td>ok</td></tr>
            "#,
        );
        let page = parse_titles_html(&html).unwrap();
        assert_eq!(page.row_count, 4);
        assert_eq!(page.skipped, 1);
        assert_eq!(page.titles.len(), 1);
        assert_eq!(page.titles[0].name, "ok");
    }

    #[test]
    fn test_changed_layout_yields_no_rows() {
        let html = r#"<html><body><div id="content"><table><tbody>
            <tr><td></td><td></td><td>orphan</td></tr>
            </tbody></table></div></body></html>"#;
        let page = parse_titles_html(html).unwrap();
        assert_eq!(page.row_count, 0);
        assert!(page.titles.is_empty());
    }
}
