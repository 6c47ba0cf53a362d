use crate::config::capacity_for;
use crate::optional::Optional;
use crate::pipeline::{Pipeline, Stream};
use crate::stage::Stage;

/// 逐个消费元素。
struct ForEachStage<F> {
    consumer: F,
}

impl<T, F: FnMut(T)> Stage<T> for ForEachStage<F> {
    fn accept(&mut self, item: T) {
        (self.consumer)(item);
    }
}

/// 匹配方式，决定初始结果以及遇到怎样的元素时可以提前得出结论。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum MatchKind {
    All,
    Any,
    None,
}

impl MatchKind {
    /// 空流的结果。
    fn empty_result(self) -> bool {
        !matches!(self, MatchKind::Any)
    }

    /// 断言结果为此值时即可得出结论。
    fn decisive(self) -> bool {
        !matches!(self, MatchKind::All)
    }
}

struct MatchStage<F> {
    kind: MatchKind,
    test: F,
    result: bool,
    decided: bool,
}

impl<F> MatchStage<F> {
    fn new(kind: MatchKind, test: F) -> Self {
        MatchStage { kind, test, result: kind.empty_result(), decided: false }
    }
}

impl<T, F: FnMut(&T) -> bool> Stage<T> for MatchStage<F> {
    fn accept(&mut self, item: T) {
        if !self.decided && (self.test)(&item) == self.kind.decisive() {
            self.result = !self.kind.empty_result();
            self.decided = true;
        }
    }

    fn can_finish(&self) -> bool {
        self.decided
    }
}

/// 无初始值的归约，第一个元素作为初始值。
struct ReduceStage<T, F> {
    acc: Option<T>,
    op: F,
}

impl<T, F: FnMut(T, T) -> T> Stage<T> for ReduceStage<T, F> {
    fn accept(&mut self, item: T) {
        self.acc = Some(match self.acc.take() {
            Some(acc) => (self.op)(acc, item),
            None => item,
        });
    }
}

/// 带初始值的归约，初始值根据元素个数构造。
///
/// 初始值在`begin`时构造；流水线没有调用`begin`时，在第一个元素到达或归约结束时按未知个数构造。
struct FoldStage<R, B, F> {
    build: Option<B>,
    acc: Option<R>,
    f: F,
}

impl<R, B, F> FoldStage<R, B, F>
where
    B: FnOnce(Option<usize>) -> R,
{
    fn new(build: B, f: F) -> Self {
        FoldStage { build: Some(build), acc: None, f }
    }

    /// 取出当前累计值，尚未构造初始值时先构造。
    fn take_acc(&mut self, size: Option<usize>) -> R {
        match (self.acc.take(), self.build.take()) {
            (Some(acc), _) => acc,
            (None, Some(build)) => build(size),
            (None, None) => accumulator_lost(),
        }
    }
}

/// 累计值只在归约函数执行期间被取出，归约函数panic时整个执行随之展开。
#[cold]
fn accumulator_lost() -> ! {
    panic!("[Reduce] Accumulator is absent outside of the reduce function")
}

impl<T, R, B, F> Stage<T> for FoldStage<R, B, F>
where
    B: FnOnce(Option<usize>) -> R,
    F: FnMut(R, T) -> R,
{
    fn begin(&mut self, size: Option<usize>) {
        let acc = self.take_acc(size);
        self.acc = Some(acc);
    }

    fn accept(&mut self, item: T) {
        let acc = self.take_acc(None);
        self.acc = Some((self.f)(acc, item));
    }
}

struct FindFirstStage<T> {
    found: Option<T>,
}

impl<T> Stage<T> for FindFirstStage<T> {
    fn accept(&mut self, item: T) {
        if self.found.is_none() {
            self.found = Some(item);
        }
    }

    fn can_finish(&self) -> bool {
        self.found.is_some()
    }
}

impl<P: Pipeline> Stream<P> {
    /// 消费流中的每个元素。
    pub fn for_each<F>(self, consumer: F)
    where
        F: FnMut(P::Item),
    {
        self.execute(ForEachStage { consumer });
    }

    /// 按顺序收集为`Vec`，元素个数已知时预先分配容量。
    pub fn to_vec(self) -> Vec<P::Item> {
        self.reduce_by(
            |size| Vec::with_capacity(capacity_for(size)),
            |mut vec, item| {
                vec.push(item);
                vec
            },
        )
    }

    /// 收集到任意可扩展的集合中。
    pub fn collect<C>(self) -> C
    where
        C: Default + Extend<P::Item>,
    {
        let mut collection = C::default();
        self.for_each(|item| collection.extend(Some(item)));
        collection
    }

    /// 是否所有元素都满足断言，空流返回`true`，遇到第一个不满足的元素即结束。
    pub fn all_match<F>(self, test: F) -> bool
    where
        F: FnMut(&P::Item) -> bool,
    {
        self.execute(MatchStage::new(MatchKind::All, test)).result
    }

    /// 是否没有元素满足断言，空流返回`true`，遇到第一个满足的元素即结束。
    pub fn none_match<F>(self, test: F) -> bool
    where
        F: FnMut(&P::Item) -> bool,
    {
        self.execute(MatchStage::new(MatchKind::None, test)).result
    }

    /// 是否有任意元素满足断言，空流返回`false`，遇到第一个满足的元素即结束。
    pub fn any_match<F>(self, test: F) -> bool
    where
        F: FnMut(&P::Item) -> bool,
    {
        self.execute(MatchStage::new(MatchKind::Any, test)).result
    }

    /// 以第一个元素为初始值归约，空流返回空值。
    pub fn reduce<F>(self, op: F) -> Optional<P::Item>
    where
        F: FnMut(P::Item, P::Item) -> P::Item,
    {
        self.execute(ReduceStage { acc: None, op }).acc.into()
    }

    /// 从与元素同类型的初始值开始归约，空流返回初始值。
    pub fn reduce_from<F>(self, init: P::Item, op: F) -> P::Item
    where
        F: FnMut(P::Item, P::Item) -> P::Item,
    {
        self.reduce_with(init, op)
    }

    /// 从任意类型的初始值开始归约：`(R, T) -> R`
    pub fn reduce_with<R, F>(self, init: R, f: F) -> R
    where
        F: FnMut(R, P::Item) -> R,
    {
        self.reduce_by(|_| init, f)
    }

    /// 先用元素个数（未知时为`None`）构造初始值，再逐个累计元素。
    pub fn reduce_by<R, B, F>(self, build: B, f: F) -> R
    where
        B: FnOnce(Option<usize>) -> R,
        F: FnMut(R, P::Item) -> R,
    {
        self.execute(FoldStage::new(build, f)).take_acc(None)
    }

    /// 返回第一个元素，找到后即结束。
    pub fn find_first(self) -> Optional<P::Item> {
        self.execute(FindFirstStage { found: None }).found.into()
    }

    /// 元素个数。
    pub fn count(self) -> usize {
        self.reduce_with(0, |count, _| count + 1)
    }
}
