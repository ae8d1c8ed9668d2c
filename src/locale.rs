//! 本地化字符串表
//!
//! 表单占位符、按钮文字以及预检校验信息，支持 `en` 与 `ru`

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// `Accept-Language` 中的单项，例如 `ru-RU;q=0.9`
    static ref ACCEPT_LANGUAGE_ITEM: Option<Regex> =
        Regex::new(r"^\s*([A-Za-z]{1,8})(?:-[A-Za-z0-9]{1,8})*\s*(?:;\s*q\s*=\s*([0-9.]+))?\s*$").ok();
}

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "question_text" => "Question",
    "answer_option" => "Answer option #",
    "remove" => "Remove",
    "save" => "Save",
    "add_question" => "Add question",
    "quiz_name" => "Quiz Name",
    "error_no_questions" => "Quiz should contain at least one question",
    "error_no_quiz_name" => "Quiz name is required",
    "error_no_question_text" => "Question text is required",
    "error_not_enough_answers" => "Question should contain at lease 2 options to answer",
    "error_question_too_many_answers" => "Question shouldn't contain more than one answer",
    "error_question_no_answers" => "Question should contain at least one answer",
    "error_no_answer_text" => "Answer text is required",
    "error_wrong_data" => "Got wrong data, should be dict of questions",
};

static RU: phf::Map<&'static str, &'static str> = phf_map! {
    "question_text" => "Текст вопроса",
    "answer_option" => "Ответ №",
    "remove" => "Удалить",
    "save" => "Сохранить",
    "add_question" => "Добавить вопрос",
    "quiz_name" => "Название Опроса",
    "error_no_questions" => "Опросник должен сождержать как минимум один вопрос",
    "error_no_quiz_name" => "Необходимо ввести название опросника",
    "error_no_question_text" => "Текст вопроса не может быть пуст",
    "error_not_enough_answers" => "Вопрос должен иметь как минимум 2 варианта ответа",
    "error_question_too_many_answers" => "Вопрос не может иметь несколько вариантов ответов",
    "error_question_no_answers" => "Вопрос должен иметь выбранный ответ",
    "error_no_answer_text" => "Ответ не может быть пустым",
    "error_wrong_data" => "Получен неверный формат данных, должен быть словарь вопросов",
};

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    /// 语言代码
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }

    /// 按 `Accept-Language` 头选出第一个支持的语言，按 q 值降序
    ///
    /// 例如 `"ru-RU,ru;q=0.9,en;q=0.8"` 返回 `Lang::Ru`。
    /// 配置项 `QUIZ_ACCEPT_LANGUAGE` 经由此函数解析
    pub fn best_match(accept_language: &str) -> Self {
        let Some(re) = ACCEPT_LANGUAGE_ITEM.as_ref() else {
            return Lang::default();
        };

        let mut candidates: Vec<(f32, Lang)> = accept_language
            .split(',')
            .filter_map(|part| {
                let caps = re.captures(part)?;
                let lang = caps.get(1)?.as_str().parse::<Lang>().ok()?;
                let q = caps
                    .get(2)
                    .and_then(|m| m.as_str().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((q, lang))
            })
            .filter(|(q, _)| *q > 0.0)
            .collect();

        // 稳定排序，q 值相同时保留原有顺序
        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        candidates.first().map(|(_, lang)| *lang).unwrap_or_default()
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ru" => Ok(Lang::Ru),
            other => Err(format!("不支持的语言: {}", other)),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 某一语言的字符串表
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    lang: Lang,
    table: &'static phf::Map<&'static str, &'static str>,
}

impl Locale {
    pub fn new(lang: Lang) -> Self {
        let table = match lang {
            Lang::En => &EN,
            Lang::Ru => &RU,
        };
        Self { lang, table }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// 查找字符串，缺失时返回键本身
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        match self.table.get(key) {
            Some(value) => *value,
            None => key,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(Lang::default())
    }
}
