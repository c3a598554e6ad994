//! 报表排版
//!
//! 坐标单位为 PDF 点，y 从页面顶部向下计算，写入 PDF 时再翻转。

use super::metrics::{line_height, text_width, wrap_text};
use crate::app::catalog::model::Item;

/// US Letter
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;

pub const TITLE: &str = "Relatório de Itens";
const TITLE_SIZE: f32 = 20.0;
const HEADER_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const TABLE_TOP: f32 = 100.0;
const ID_X: f32 = 50.0;
const NAME_X: f32 = 150.0;
const DESCRIPTION_X: f32 = 350.0;
const RULE_START: f32 = 50.0;
const RULE_END: f32 = 550.0;

const ID_WIDTH: f32 = 100.0;
const TEXT_WIDTH: f32 = 180.0;

const HEADER_RULE_OFFSET: f32 = 15.0;
const FIRST_ROW_OFFSET: f32 = 25.0;
const ROW_RULE_OFFSET: f32 = 5.0;
const ROW_SPACING: f32 = 10.0;

/// 正文可用区域的底边
const BOTTOM: f32 = PAGE_HEIGHT - MARGIN;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// 一行文本，`y` 为行顶
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
    },
    /// 水平分隔线
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

/// 一行商品在报表中的位置
///
/// `height` 是换行后的总高度。行高超过页面剩余空间时，文本逐行续排到下一页，
/// `end_page` 是该行结束（分隔线所在）的页。
#[derive(Debug, Clone, PartialEq)]
pub struct RowPlacement {
    pub item_id: i64,
    pub page: usize,
    pub end_page: usize,
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<Page>,
    pub rows: Vec<RowPlacement>,
}

impl ReportLayout {
    /// 所有页面上的文本，按写入顺序
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|element| match element {
                Element::Text { text, .. } => Some(text.as_str()),
                Element::Rule { .. } => None,
            })
    }
}

/// 按商品顺序排版整张表格，超出页面底部时换页并重复表头
pub fn layout_report(items: &[Item]) -> ReportLayout {
    let mut layout = ReportLayout::default();
    let step = line_height(BODY_SIZE);

    let mut page = Page::default();
    let title_x = (PAGE_WIDTH - text_width(TITLE, TITLE_SIZE)) / 2.0;
    push_text(&mut page, title_x, MARGIN, TITLE_SIZE, TITLE.to_string());
    let mut y = push_header(&mut page, TABLE_TOP);
    let mut rows_on_page = 0;

    for item in items {
        let id = item.id.to_string();
        let columns = [
            (ID_X, wrap_text(&id, ID_WIDTH, BODY_SIZE)),
            (NAME_X, wrap_text(&item.name, TEXT_WIDTH, BODY_SIZE)),
            (DESCRIPTION_X, wrap_text(&item.description, TEXT_WIDTH, BODY_SIZE)),
        ];
        let line_count = columns.iter().map(|(_, lines)| lines.len()).max().unwrap_or(0);
        let height = line_count as f32 * step;

        if rows_on_page > 0 && y + height + ROW_RULE_OFFSET > BOTTOM {
            y = start_page(&mut layout, &mut page);
            rows_on_page = 0;
        }

        let page_index = layout.pages.len();
        let top = y;
        let mut lines_on_page = 0;

        for i in 0..line_count {
            // 整行放不下时逐行续排
            if lines_on_page > 0 && y + step > BOTTOM {
                y = start_page(&mut layout, &mut page);
                lines_on_page = 0;
            }
            for (x, lines) in &columns {
                if let Some(line) = lines.get(i) {
                    push_text(&mut page, *x, y, BODY_SIZE, line.clone());
                }
            }
            y += step;
            lines_on_page += 1;
        }

        page.elements.push(Element::Rule {
            x1: RULE_START,
            x2: RULE_END,
            y: y + ROW_RULE_OFFSET,
        });

        layout.rows.push(RowPlacement {
            item_id: item.id,
            page: page_index,
            end_page: layout.pages.len(),
            top,
            height,
        });

        y += ROW_SPACING;
        rows_on_page += 1;
    }

    layout.pages.push(page);
    layout
}

/// 结束当前页，在新页顶部重复表头，返回新页第一行的起始 y
fn start_page(layout: &mut ReportLayout, page: &mut Page) -> f32 {
    layout.pages.push(std::mem::take(page));
    push_header(page, MARGIN)
}

/// 写表头和分隔线，返回第一行的起始 y
fn push_header(page: &mut Page, top: f32) -> f32 {
    push_text(page, ID_X, top, HEADER_SIZE, "ID".to_string());
    push_text(page, NAME_X, top, HEADER_SIZE, "Nome".to_string());
    push_text(page, DESCRIPTION_X, top, HEADER_SIZE, "Descrição".to_string());

    page.elements.push(Element::Rule {
        x1: RULE_START,
        x2: RULE_END,
        y: top + HEADER_RULE_OFFSET,
    });

    top + FIRST_ROW_OFFSET
}

fn push_text(page: &mut Page, x: f32, y: f32, size: f32, text: String) {
    page.elements.push(Element::Text { x, y, size, text });
}
