//! 表单的 HTML 渲染
//!
//! 纯函数，输入是内存模型，输出与原有页面一致的标记结构：
//! 容器 `#questions`、`name="question_<n>"` 的题目块、
//! `optionRadios<n>` 单选组以及 `alert-row` 错误横幅。
//! 所有用户文本由 maud 转义。

use maud::{html, Markup};

use crate::locale::Locale;
use crate::models::{QuestionBlock, QuizForm, ReorderBinding};

/// 错误横幅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// 可能包含换行，渲染时保留
    pub message: String,
}

impl Banner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 渲染单个题目块，`index` 为从 1 开始的显示序号
pub fn render_block(block: &QuestionBlock, index: usize, locale: &Locale) -> Markup {
    let ignore_drag = ReorderBinding::FILTER_CLASS;
    html! {
        div.row {
            div class="list-group-item question" name=(format!("question_{}", index)) data-block-id=(block.id.0) {
                div class=(ignore_drag) {
                    textarea type="text" name="question_text" placeholder=(locale.get("question_text")) {
                        (block.text)
                    }
                }
                div class=(ignore_drag) {
                    @for (row, option) in block.options.iter().enumerate() {
                        div class="d-flex m-2" {
                            input type="radio" name=(format!("optionRadios{}", index)) checked[block.selected == Some(row)];
                            input type="text"
                                name=(format!("option{}", row + 1))
                                placeholder=(format!("{}{}", locale.get("answer_option"), row + 1))
                                value=(option.text);
                        }
                    }
                }
                button type="button" class=(format!("btn btn-outline-danger float-right {}", ignore_drag)) {
                    (locale.get("remove"))
                }
            }
        }
    }
}

/// 渲染错误横幅
pub fn render_banner(banner: &Banner) -> Markup {
    html! {
        div.alert-row {
            div class="alert alert-danger" style="white-space: pre-line;" {
                (banner.message)
            }
        }
    }
}

/// 渲染整个表单内容区域，横幅位于最前
pub fn render_form(form: &QuizForm, banner: Option<&Banner>, locale: &Locale) -> Markup {
    html! {
        div.content {
            @if let Some(banner) = banner {
                (render_banner(banner))
            }
            input type="text" id="quiz-name" placeholder=(locale.get("quiz_name")) value=(form.name());
            div id="questions" {
                @for (pos, block) in form.blocks().iter().enumerate() {
                    (render_block(block, pos + 1, locale))
                }
            }
            button type="button" class="btn btn-outline-primary" { (locale.get("add_question")) }
            button type="button" class="btn btn-primary" { (locale.get("save")) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Lang;

    #[test]
    fn test_block_markup_contract() {
        let mut form = QuizForm::new();
        form.add_block();
        let id = form.add_block();
        form.set_option_text(id, 1, "4").unwrap();
        form.select_correct(id, 1).unwrap();

        let html = render_block(form.block(id).unwrap(), 2, &Locale::new(Lang::En)).into_string();
        assert!(html.contains(r#"name="question_2""#));
        assert!(html.contains(r#"name="optionRadios2" checked><input type="text" name="option2""#));
        assert_eq!(html.matches(r#"name="optionRadios2""#).count(), 4);
        assert!(html.contains(r#"placeholder="Answer option #4""#));
        assert!(html.contains(">Remove</button>"));
        assert!(html.contains(r#"class="btn btn-outline-danger float-right ignore-drag""#));
    }

    #[test]
    fn test_form_numbers_blocks_in_order() {
        let mut form = QuizForm::new();
        for _ in 0..3 {
            form.add_block();
        }
        let html = render_form(&form, None, &Locale::new(Lang::Ru)).into_string();
        assert_eq!(html.matches(r#"name="question_"#).count(), 3);
        let first = html.find(r#"name="question_1""#).unwrap();
        let third = html.find(r#"name="question_3""#).unwrap();
        assert!(first < third);
        assert!(html.contains("Текст вопроса"));
        assert!(!html.contains("alert-row"));
    }

    #[test]
    fn test_banner_is_first_and_escaped() {
        let mut form = QuizForm::new();
        form.set_name("<b>quiz</b>");
        let banner = Banner::new("Quiz name is required\nA & B <script>");
        let html = render_form(&form, Some(&banner), &Locale::default()).into_string();

        assert!(html.starts_with(r#"<div class="content"><div class="alert-row">"#));
        assert!(html.contains(
            "white-space: pre-line;\">Quiz name is required\nA &amp; B &lt;script&gt;</div>"
        ));
        assert!(html.contains("&lt;b&gt;quiz&lt;/b&gt;"));
    }
}
