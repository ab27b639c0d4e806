//! Reading Session - 显示偏好

use serde::{Deserialize, Serialize};

/// 阅读方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl ReadingDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }

    /// "下一页" 对应的索引增量符号
    pub fn sign(self) -> isize {
        match self {
            Self::Ltr => 1,
            Self::Rtl => -1,
        }
    }
}

/// 主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ja,
}

/// 跨重启保存的用户偏好
///
/// 与页面内容无关，原样持久化
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub reading_direction: ReadingDirection,
    pub spread: bool,
    pub gapless: bool,
    pub theme: Theme,
    pub locale: Locale,
}
