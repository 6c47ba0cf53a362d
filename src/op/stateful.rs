use crate::config::capacity_for;
use crate::pipeline::{Pipeline, Stream};
use crate::stage::Stage;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::hash::Hash;
use tracing::trace;

/* **************************************** 去重 **************************************** */

/// 去重状态，记录已经出现过的键。
///
/// 只按键判断重复，不再比较元素本身：键相同的两个不同元素视为重复。
#[derive(Debug)]
pub(crate) struct DistinctState<K> {
    seen: FxHashSet<K>,
}

impl<K: Hash + Eq> DistinctState<K> {
    pub(crate) fn new() -> Self {
        DistinctState { seen: FxHashSet::default() }
    }

    /// 首次出现返回`true`。
    pub(crate) fn first_seen(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    pub(crate) fn clear(&mut self) {
        self.seen.clear();
    }
}

/// 去重节点。
pub struct Distinct<P, F> {
    prev: P,
    key: F,
}

struct DistinctStage<D, F, K> {
    down: D,
    key: F,
    state: DistinctState<K>,
}

impl<T, K, D, F> Stage<T> for DistinctStage<D, F, K>
where
    K: Hash + Eq,
    D: Stage<T>,
    F: FnMut(&T) -> K,
{
    fn begin(&mut self, _size: Option<usize>) {
        self.down.begin(None); // 去重后个数不确定
    }

    fn accept(&mut self, item: T) {
        if self.state.first_seen((self.key)(&item)) {
            self.down.accept(item);
        }
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        self.state.clear();
        self.down.end();
    }
}

impl<P, F, K> Pipeline for Distinct<P, F>
where
    P: Pipeline,
    K: Hash + Eq,
    F: FnMut(&P::Item) -> K,
{
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(DistinctStage { down, key: self.key, state: DistinctState::new() }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("distinct".to_owned());
    }
}

/* **************************************** 排序 **************************************** */

/// 排序状态，缓存全部输入元素直到上游结束。
#[derive(Debug)]
pub(crate) struct SortState<T> {
    buffer: Vec<T>,
}

impl<T> SortState<T> {
    pub(crate) fn new() -> Self {
        SortState { buffer: Vec::new() }
    }

    pub(crate) fn reserve(&mut self, size: Option<usize>) {
        self.buffer.reserve(capacity_for(size));
    }

    pub(crate) fn push(&mut self, item: T) {
        self.buffer.push(item);
    }

    /// 稳定排序并取出全部元素，缓存随之清空。
    pub(crate) fn take_sorted(&mut self, cmp: impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
        let mut sorted = std::mem::take(&mut self.buffer);
        sorted.sort_by(cmp);
        sorted
    }
}

/// 排序节点。
pub struct Sorted<P, F> {
    prev: P,
    cmp: F,
}

struct SortedStage<T, D, F> {
    down: D,
    cmp: F,
    state: SortState<T>,
}

impl<T, D, F> Stage<T> for SortedStage<T, D, F>
where
    D: Stage<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    fn begin(&mut self, size: Option<usize>) {
        // 下游的begin推迟到end时再以确切个数宣告
        self.state.reserve(size);
    }

    fn accept(&mut self, item: T) {
        self.state.push(item);
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        let sorted = self.state.take_sorted(&mut self.cmp);
        trace!(len = sorted.len(), "sorted buffer flushed");
        self.down.begin(Some(sorted.len()));
        for item in sorted {
            if self.down.can_finish() {
                break;
            }
            self.down.accept(item);
        }
        self.down.end();
    }
}

impl<P, F> Pipeline for Sorted<P, F>
where
    P: Pipeline,
    F: FnMut(&P::Item, &P::Item) -> Ordering,
{
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(SortedStage { down, cmp: self.cmp, state: SortState::new() }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("sorted".to_owned());
    }
}

/* **************************************** 限制个数 **************************************** */

/// 限制个数状态。
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct LimitState {
    max: usize,
    count: usize,
}

impl LimitState {
    pub(crate) fn new(max: usize) -> Self {
        LimitState { max, count: 0 }
    }

    /// 未达上限时计数并返回`true`。
    pub(crate) fn admit(&mut self) -> bool {
        if self.count < self.max {
            self.count += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count >= self.max
    }

    pub(crate) fn adjust(&self, size: Option<usize>) -> Option<usize> {
        size.map(|size| size.min(self.max))
    }
}

/// 限制个数节点。
pub struct Limit<P> {
    prev: P,
    max: usize,
}

struct LimitStage<D> {
    down: D,
    state: LimitState,
}

impl<T, D: Stage<T>> Stage<T> for LimitStage<D> {
    fn begin(&mut self, size: Option<usize>) {
        self.down.begin(self.state.adjust(size));
    }

    fn accept(&mut self, item: T) {
        if self.state.admit() {
            self.down.accept(item);
        }
    }

    fn can_finish(&self) -> bool {
        self.state.is_full() || self.down.can_finish() // 已经达到限制数量即可提前结束
    }

    fn end(&mut self) {
        self.down.end();
    }
}

impl<P: Pipeline> Pipeline for Limit<P> {
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(LimitStage { down, state: LimitState::new(self.max) }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push(format!("limit({})", self.max));
    }
}

/* **************************************** 跳过 **************************************** */

/// 跳过状态。
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct SkipState {
    skip: usize,
    count: usize,
}

impl SkipState {
    pub(crate) fn new(skip: usize) -> Self {
        SkipState { skip, count: 0 }
    }

    /// 已经跳过足够多的元素时返回`true`，否则计数并返回`false`。
    pub(crate) fn pass(&mut self) -> bool {
        if self.count >= self.skip {
            true
        } else {
            self.count += 1;
            false
        }
    }

    pub(crate) fn adjust(&self, size: Option<usize>) -> Option<usize> {
        size.map(|size| size.saturating_sub(self.skip))
    }
}

/// 跳过节点。
pub struct Skip<P> {
    prev: P,
    skip: usize,
}

struct SkipStage<D> {
    down: D,
    state: SkipState,
}

impl<T, D: Stage<T>> Stage<T> for SkipStage<D> {
    fn begin(&mut self, size: Option<usize>) {
        self.down.begin(self.state.adjust(size));
    }

    fn accept(&mut self, item: T) {
        if self.state.pass() {
            self.down.accept(item);
        }
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        self.down.end();
    }
}

impl<P: Pipeline> Pipeline for Skip<P> {
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(SkipStage { down, state: SkipState::new(self.skip) }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push(format!("skip({})", self.skip));
    }
}

impl<P: Pipeline> Stream<P> {
    /// 去重，`key`返回元素的唯一标识，每个标识只保留首次出现的元素。
    pub fn distinct<K, F>(self, key: F) -> Stream<Distinct<P, F>>
    where
        K: Hash + Eq,
        F: FnMut(&P::Item) -> K,
    {
        self.chain(|prev| Distinct { prev, key })
    }

    /// 稳定排序，`cmp`返回左右两个元素的先后关系。
    ///
    /// 排序需要缓存全部输入，之后的`limit`等操作只能在输出阶段提前结束。
    pub fn sorted<F>(self, cmp: F) -> Stream<Sorted<P, F>>
    where
        F: FnMut(&P::Item, &P::Item) -> Ordering,
    {
        self.chain(|prev| Sorted { prev, cmp })
    }

    /// 限制元素个数，达到个数后上游提前结束。
    pub fn limit(self, max: usize) -> Stream<Limit<P>> {
        self.chain(|prev| Limit { prev, max })
    }

    /// 跳过前`skip`个元素。
    pub fn skip(self, skip: usize) -> Stream<Skip<P>> {
        self.chain(|prev| Skip { prev, skip })
    }
}
