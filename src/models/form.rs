//! 测验编辑表单的内存模型
//!
//! 表单是唯一的数据来源，页面只是它的渲染结果。
//! 题目块和选项行都用递增生成的稳定 ID 标识，删除后不会复用。

use std::fmt;

use crate::error::FormError;
use crate::models::quiz::{OptionSet, Quiz, QuestionSet};

/// 每个题目块固定的选项行数
pub const OPTIONS_PER_QUESTION: usize = 4;

/// 题目块 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 选项行 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId(pub u64);

/// 选项行：正确性单选框 + 文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    pub id: OptionId,
    pub text: String,
}

/// 题目块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock {
    pub id: BlockId,
    pub text: String,
    pub options: [OptionRow; OPTIONS_PER_QUESTION],
    /// 被选中的选项行索引，同一块内只能选一个
    pub selected: Option<usize>,
}

impl QuestionBlock {
    /// 生成选项集合，空文本的选项不参与序列化，
    /// 即使它就是被选中的那一行
    pub fn option_set(&self) -> OptionSet {
        let mut set = OptionSet::new();
        for (index, row) in self.options.iter().enumerate() {
            if !row.text.is_empty() {
                set.insert(row.text.clone(), self.selected == Some(index));
            }
        }
        set
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut OptionRow, FormError> {
        self.options.get_mut(index).ok_or(FormError::OptionOutOfRange {
            index,
            max_index: OPTIONS_PER_QUESTION,
        })
    }
}

/// 测验表单
#[derive(Debug, Clone, Default)]
pub struct QuizForm {
    name: String,
    blocks: Vec<QuestionBlock>,
    next_id: u64,
}

impl QuizForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn blocks(&self) -> &[QuestionBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 追加一个空白题目块，返回其 ID
    pub fn add_block(&mut self) -> BlockId {
        let id = BlockId(self.next_id());
        let options = std::array::from_fn(|_| OptionRow {
            id: OptionId(self.next_id()),
            text: String::new(),
        });
        self.blocks.push(QuestionBlock {
            id,
            text: String::new(),
            options,
            selected: None,
        });
        id
    }

    /// 删除题目块，返回被删除的块
    pub fn remove_block(&mut self, id: BlockId) -> Result<QuestionBlock, FormError> {
        let pos = self.position(id)?;
        Ok(self.blocks.remove(pos))
    }

    /// 把题目块移动到 `to_index`，超出范围时放到末尾
    pub fn move_block(&mut self, id: BlockId, to_index: usize) -> Result<(), FormError> {
        let from = self.position(id)?;
        let block = self.blocks.remove(from);
        let to = to_index.min(self.blocks.len());
        self.blocks.insert(to, block);
        Ok(())
    }

    pub fn block(&self, id: BlockId) -> Result<&QuestionBlock, FormError> {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .ok_or(FormError::BlockNotFound(id.0))
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut QuestionBlock, FormError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(FormError::BlockNotFound(id.0))
    }

    /// 题目块在表单中的位置（从 0 开始）
    pub fn position(&self, id: BlockId) -> Result<usize, FormError> {
        self.blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(FormError::BlockNotFound(id.0))
    }

    /// 题目块的显示序号（从 1 开始）
    pub fn display_index(&self, id: BlockId) -> Result<usize, FormError> {
        self.position(id).map(|p| p + 1)
    }

    pub fn set_question_text(&mut self, id: BlockId, text: impl Into<String>) -> Result<(), FormError> {
        self.block_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn set_option_text(
        &mut self,
        id: BlockId,
        row: usize,
        text: impl Into<String>,
    ) -> Result<(), FormError> {
        self.block_mut(id)?.row_mut(row)?.text = text.into();
        Ok(())
    }

    /// 选中某一行为正确答案，同一块内之前的选择被取消
    pub fn select_correct(&mut self, id: BlockId, row: usize) -> Result<(), FormError> {
        let block = self.block_mut(id)?;
        block.row_mut(row)?;
        block.selected = Some(row);
        Ok(())
    }

    /// 按当前顺序生成保存载荷
    pub fn to_quiz(&self) -> Quiz {
        let mut questions = QuestionSet::new();
        for block in &self.blocks {
            questions.insert(block.text.clone(), block.option_set());
        }
        Quiz::new(self.name.clone(), questions)
    }
}

/// 拖拽时被按住的元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// 题目块本身（非输入区域）
    Handle,
    QuestionText,
    OptionRow(usize),
    RemoveButton,
}

impl DragTarget {
    /// 是否带有 `ignore-drag` 标记
    pub fn is_ignore_drag(self) -> bool {
        !matches!(self, DragTarget::Handle)
    }
}

/// 拖拽排序绑定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderBinding {
    /// 每次重新绑定递增
    pub generation: u64,
    pub animation_ms: u32,
    /// 被过滤的元素不阻止默认行为，保持可编辑
    pub prevent_on_filter: bool,
}

impl ReorderBinding {
    pub const ANIMATION_MS: u32 = 350;
    pub const FILTER_CLASS: &'static str = "ignore-drag";

    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            animation_ms: Self::ANIMATION_MS,
            prevent_on_filter: false,
        }
    }

    /// 被按住的元素能否发起拖拽
    pub fn accepts(&self, target: DragTarget) -> bool {
        !target.is_ignore_drag()
    }
}
