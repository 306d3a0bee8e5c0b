//! 题目发现
//!
//! 分页拉取带质量标记的题目列表，去重后随机抽样，结果可直接作为批量任务的输入

use crate::clients::{JudgeApi, PageToken};
use crate::error::ListingError;
use futures::stream::{self, Stream, TryStreamExt};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 题目发现器
pub struct Discovery {
    judge: Arc<dyn JudgeApi>,
    page_size: usize,
    max_pages: usize,
}

impl Discovery {
    pub fn new(judge: Arc<dyn JudgeApi>, page_size: usize, max_pages: usize) -> Self {
        Self {
            judge,
            page_size: page_size.max(1),
            max_pages,
        }
    }

    /// 逐页拉取的惰性流，遇到空页、不满页或页数上限时结束
    pub fn pages(&self) -> impl Stream<Item = Result<Vec<String>, ListingError>> + '_ {
        stream::try_unfold(Some(PageToken::first(self.page_size)), move |token| async move {
            let Some(token) = token.filter(|t| t.page <= self.max_pages) else {
                return Ok::<_, ListingError>(None);
            };

            let page = self
                .judge
                .list_quality_problems(token)
                .await
                .map_err(|source| ListingError::PageFailed {
                    page: token.page,
                    source,
                })?;

            debug!("📄 第 {} 页: {} 道题", token.page, page.aliases.len());
            Ok(Some((page.aliases, page.next)))
        })
    }

    /// 拉取全部题目，保留首次出现的顺序去重
    pub async fn collect_all(&self) -> Result<Vec<String>, ListingError> {
        let pages: Vec<Vec<String>> = self.pages().try_collect().await?;

        let mut seen = HashSet::new();
        let aliases: Vec<String> = pages
            .into_iter()
            .flatten()
            .filter(|alias| seen.insert(alias.clone()))
            .collect();

        info!("✓ 共找到 {} 道带质量标记的题目", aliases.len());
        Ok(aliases)
    }

    /// 拉取并抽样 `count` 道题
    pub async fn discover(&self, count: usize, seed: Option<u64>) -> Result<Vec<String>, ListingError> {
        info!("🔍 正在拉取带质量标记的题目列表...");
        let aliases = self.collect_all().await?;
        let sampled = sample(aliases, count, seed);
        info!("🎲 抽取了 {} 道题", sampled.len());
        Ok(sampled)
    }
}

/// 无放回均匀抽样，不足 `count` 时返回全部（打乱后）
pub fn sample(mut aliases: Vec<String>, count: usize, seed: Option<u64>) -> Vec<String> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    aliases.shuffle(&mut rng);
    aliases.truncate(count);
    aliases
}
