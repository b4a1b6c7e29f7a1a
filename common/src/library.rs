//! カードライブラリ（セッション内の集計）
//!
//! カード名ごとに1行だけを持ち、枚数0の行は残さない。
//! IDは注入されたジェネレータから払い出す。

use crate::error::{Error, Result};
use crate::types::CardEntry;

/// カードIDの払い出し
pub trait IdGenerator {
    fn next_id(&mut self, name: &str) -> String;
}

/// `<カード名>-<連番>` 形式のID
///
/// 連番はライブラリ全体で単調増加するので、同時刻の登録でも衝突しない
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, name: &str) -> String {
        self.counter += 1;
        format!("{}-{}", name, self.counter)
    }
}

/// 枚数調整の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjusted {
    Updated(CardEntry),
    Removed(CardEntry),
}

/// エクスポート用の1行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub quantity: u32,
}

/// エクスポート行のイテレータ
///
/// ライブラリを借用するだけなので、cloneすれば先頭からやり直せる
#[derive(Debug, Clone)]
pub struct ExportRows<'a> {
    inner: std::slice::Iter<'a, CardEntry>,
}

impl<'a> Iterator for ExportRows<'a> {
    type Item = ExportRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| ExportRow {
            name: &e.name,
            id: &e.id,
            quantity: e.quantity,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ExportRows<'_> {}

#[derive(Debug, Clone, Default)]
pub struct LibraryStore<G = SequentialIds> {
    entries: Vec<CardEntry>,
    ids: G,
}

impl LibraryStore<SequentialIds> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: IdGenerator> LibraryStore<G> {
    pub fn with_id_generator(ids: G) -> Self {
        Self {
            entries: Vec::new(),
            ids,
        }
    }

    /// 照合成功を反映
    ///
    /// 既存のカード名なら枚数+1、新しい名前なら枚数1で末尾に追加
    pub fn record_match(&mut self, name: &str) -> Result<&CardEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyCardName);
        }

        let index = match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.quantity = entry.quantity.saturating_add(1);
                index
            }
            None => {
                let id = self.ids.next_id(name);
                self.entries.push(CardEntry {
                    name: name.to_string(),
                    id,
                    quantity: 1,
                });
                self.entries.len() - 1
            }
        };

        Ok(&self.entries[index])
    }

    /// 枚数を増減。0になった行は削除する
    ///
    /// IDが見つからなければNone（何もしない）
    pub fn adjust_quantity(&mut self, id: &str, delta: i64) -> Option<Adjusted> {
        let index = self.position(id)?;
        let current = i64::from(self.entries[index].quantity);
        let next = current.saturating_add(delta).max(0);

        if next == 0 {
            return Some(Adjusted::Removed(self.entries.remove(index)));
        }

        let entry = &mut self.entries[index];
        entry.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(Adjusted::Updated(entry.clone()))
    }

    /// 枚数に関係なく削除
    pub fn remove(&mut self, id: &str) -> Option<CardEntry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    pub fn export_rows(&self) -> ExportRows<'_> {
        ExportRows {
            inner: self.entries.iter(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

impl<G> LibraryStore<G> {
    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CardEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全カードの合計枚数
    pub fn total_cards(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }
}
