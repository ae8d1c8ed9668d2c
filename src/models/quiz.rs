//! 保存请求的载荷结构
//!
//! `{ "<测验名>": { "<题目>": { "<选项>": <是否正确>, ... }, ... } }`
//!
//! 三层都是按插入顺序排列的映射。重复的键后写覆盖先写，
//! 但保留第一次插入的位置，与 JSON 对象重复赋值的行为一致。

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

use crate::locale::Locale;

/// 保留插入顺序的字符串键映射
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 插入键值，已存在的键原位覆盖并返回旧值
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OrderedMap::new();
                while let Some((k, v)) = access.next_entry::<String, V>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// 选项文本 → 是否正确
pub type OptionSet = OrderedMap<bool>;

/// 题目文本 → 选项集合
pub type QuestionSet = OrderedMap<OptionSet>;

/// 完整的测验载荷：单键映射 `{ 测验名: 题目集合 }`
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub name: String,
    pub questions: QuestionSet,
}

impl Quiz {
    pub fn new(name: impl Into<String>, questions: QuestionSet) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// 序列化为请求体
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 按服务端规则做预检，返回本地化后的错误信息列表
    ///
    /// 空列表表示服务端应当接受该测验
    pub fn validate(&self, locale: &Locale) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(locale.get("error_no_quiz_name").to_string());
        }
        if self.questions.is_empty() {
            errors.push(locale.get("error_no_questions").to_string());
        }

        for (text, options) in self.questions.iter() {
            if text.is_empty() {
                errors.push(locale.get("error_no_question_text").to_string());
            }
            if options.len() < 2 {
                errors.push(locale.get("error_not_enough_answers").to_string());
            }
            let checked = options.iter().filter(|(_, correct)| **correct).count();
            if checked > 1 {
                errors.push(locale.get("error_question_too_many_answers").to_string());
            }
            if checked == 0 {
                errors.push(locale.get("error_question_no_answers").to_string());
            }
            if options.keys().any(str::is_empty) {
                errors.push(locale.get("error_no_answer_text").to_string());
            }
        }

        errors
    }
}

impl Serialize for Quiz {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.questions)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Quiz {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // 多个键时取最后一个，与服务端遍历 JSON 对象的结果相同
        let outer = OrderedMap::<QuestionSet>::deserialize(deserializer)?;
        outer
            .entries
            .into_iter()
            .last()
            .map(|(name, questions)| Quiz { name, questions })
            .ok_or_else(|| serde::de::Error::custom("测验载荷为空对象"))
    }
}
