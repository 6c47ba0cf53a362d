use crate::pipeline::{Pipeline, Stream};
use crate::stage::{Inner, Stage};

pub mod stateful;

/* **************************************** 过滤 **************************************** */

/// 过滤节点，只保留满足断言的元素。
pub struct Filter<P, F> {
    prev: P,
    predicate: F,
}

struct FilterStage<D, F> {
    down: D,
    predicate: F,
}

impl<T, D, F> Stage<T> for FilterStage<D, F>
where
    D: Stage<T>,
    F: FnMut(&T) -> bool,
{
    fn begin(&mut self, _size: Option<usize>) {
        self.down.begin(None); // 过滤后个数不确定
    }

    fn accept(&mut self, item: T) {
        if (self.predicate)(&item) {
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

impl<P, F> Pipeline for Filter<P, F>
where
    P: Pipeline,
    F: FnMut(&P::Item) -> bool,
{
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(FilterStage { down, predicate: self.predicate }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("filter".to_owned());
    }
}

/* **************************************** 转换 **************************************** */

/// 转换节点，对每个元素应用函数，个数不变。
pub struct Map<P, F> {
    prev: P,
    f: F,
}

struct MapStage<D, F> {
    down: D,
    f: F,
}

impl<T, R, D, F> Stage<T> for MapStage<D, F>
where
    D: Stage<R>,
    F: FnMut(T) -> R,
{
    fn begin(&mut self, size: Option<usize>) {
        self.down.begin(size);
    }

    fn accept(&mut self, item: T) {
        self.down.accept((self.f)(item));
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        self.down.end();
    }
}

impl<P, F, R> Pipeline for Map<P, F>
where
    P: Pipeline,
    F: FnMut(P::Item) -> R,
{
    type Item = R;

    fn run<D: Stage<R>>(self, down: D) -> D {
        self.prev.run(MapStage { down, f: self.f }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("map".to_owned());
    }
}

/// 打平节点，每个元素转换为一个子流，子流中的全部元素依次发往下游。
pub struct FlatMap<P, F> {
    prev: P,
    flatten: F,
}

struct FlatMapStage<D, F> {
    down: D,
    flatten: F,
}

impl<T, Q, D, F> Stage<T> for FlatMapStage<D, F>
where
    Q: Pipeline,
    D: Stage<Q::Item>,
    F: FnMut(T) -> Stream<Q>,
{
    fn begin(&mut self, _size: Option<usize>) {
        self.down.begin(None); // 打平后个数不确定
    }

    fn accept(&mut self, item: T) {
        // 子流独立遍历，提前结束的判断经由Inner传递到子流中
        (self.flatten)(item).pipeline.run(Inner { down: &mut self.down });
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        self.down.end();
    }
}

impl<P, F, Q> Pipeline for FlatMap<P, F>
where
    P: Pipeline,
    Q: Pipeline,
    F: FnMut(P::Item) -> Stream<Q>,
{
    type Item = Q::Item;

    fn run<D: Stage<Q::Item>>(self, down: D) -> D {
        self.prev.run(FlatMapStage { down, flatten: self.flatten }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("flat_map".to_owned());
    }
}

/* **************************************** 访问 **************************************** */

/// 访问节点，访问每个元素后原样发往下游。
pub struct Peek<P, F> {
    prev: P,
    visit: F,
}

struct PeekStage<D, F> {
    down: D,
    visit: F,
}

impl<T, D, F> Stage<T> for PeekStage<D, F>
where
    D: Stage<T>,
    F: FnMut(&T),
{
    fn begin(&mut self, size: Option<usize>) {
        self.down.begin(size);
    }

    fn accept(&mut self, item: T) {
        (self.visit)(&item);
        self.down.accept(item);
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }

    fn end(&mut self) {
        self.down.end();
    }
}

impl<P, F> Pipeline for Peek<P, F>
where
    P: Pipeline,
    F: FnMut(&P::Item),
{
    type Item = P::Item;

    fn run<D: Stage<P::Item>>(self, down: D) -> D {
        self.prev.run(PeekStage { down, visit: self.visit }).down
    }

    fn describe(&self, ops: &mut Vec<String>) {
        self.prev.describe(ops);
        ops.push("peek".to_owned());
    }
}

impl<P: Pipeline> Stream<P> {
    /// 过滤，保留满足断言的元素。
    pub fn filter<F>(self, predicate: F) -> Stream<Filter<P, F>>
    where
        F: FnMut(&P::Item) -> bool,
    {
        self.chain(|prev| Filter { prev, predicate })
    }

    /// 转换，对每个元素应用给定的函数。
    pub fn map<R, F>(self, f: F) -> Stream<Map<P, F>>
    where
        F: FnMut(P::Item) -> R,
    {
        self.chain(|prev| Map { prev, f })
    }

    /// 打平，`[[1, 2], [3, 4]] -> [1, 2, 3, 4]`
    pub fn flat_map<Q, F>(self, flatten: F) -> Stream<FlatMap<P, F>>
    where
        Q: Pipeline,
        F: FnMut(P::Item) -> Stream<Q>,
    {
        self.chain(|prev| FlatMap { prev, flatten })
    }

    /// 访问每个元素而不消费它，可用于调试。
    pub fn peek<F>(self, visit: F) -> Stream<Peek<P, F>>
    where
        F: FnMut(&P::Item),
    {
        self.chain(|prev| Peek { prev, visit })
    }
}

#[cfg(test)]
mod tests {
    use crate::stage::Recorder;
    use crate::{of, of_iter, range, repeat, stream};
    use std::cell::Cell;

    #[test]
    fn test_filter() {
        let recorder = stream![1, 2, 3, 4, 5].filter(|x| x % 2 == 1).execute(Recorder::new());
        assert_eq!(recorder.begins, vec![None]);
        assert_eq!(recorder.items, vec![1, 3, 5]);
        assert_eq!(recorder.ends, 1);
    }

    #[test]
    fn test_map() {
        let recorder = stream![1, 2, 3].map(|x| x.to_string()).execute(Recorder::new());
        assert_eq!(recorder.begins, vec![Some(3)]);
        assert_eq!(recorder.items, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_flat_map() {
        let recorder = stream![vec![1, 2], vec![], vec![3]].flat_map(of).execute(Recorder::new());
        assert_eq!(recorder.begins, vec![None]);
        assert_eq!(recorder.items, vec![1, 2, 3]);
        assert_eq!(recorder.ends, 1);
    }

    #[test]
    fn test_flat_map_short_circuit_into_inner() {
        let produced = Cell::new(0);
        let counter = &produced;
        let res = stream![1, 2, 3]
            .flat_map(move |x| repeat(x).peek(move |_| counter.set(counter.get() + 1)))
            .limit(4)
            .to_vec();
        assert_eq!(res, vec![1, 1, 1, 1]);
        assert_eq!(produced.get(), 4);
    }

    #[test]
    fn test_flat_map_inner_iter_not_over_pulled() {
        let pulled = Cell::new(0);
        let counter = &pulled;
        let res = stream![10, 20]
            .flat_map(move |x| {
                of_iter((x..).map(move |y| {
                    counter.set(counter.get() + 1);
                    y
                }))
            })
            .limit(3)
            .to_vec();
        assert_eq!(res, vec![10, 11, 12]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_flat_map_inner_stages() {
        let res = stream![3, 1].flat_map(|n| range(0, n).sorted(|a, b| b.cmp(a))).to_vec();
        assert_eq!(res, vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_peek() {
        let mut seen = Vec::new();
        let res = stream![1, 2, 3].peek(|x| seen.push(*x)).map(|x| x * 10).to_vec();
        assert_eq!(res, vec![10, 20, 30]);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_peek_with_short_circuit() {
        let mut seen = Vec::new();
        let first = range(0, 100).peek(|x| seen.push(*x)).filter(|x| *x > 2).find_first();
        assert_eq!(first.get(), Ok(3));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_identity_pipeline() {
        let input = vec!["a", "b", "c", "d"];
        let res = of(input.clone()).filter(|_| true).map(|x| x).peek(|_| {}).flat_map(|x| stream![x]).to_vec();
        assert_eq!(res, input);
    }

    #[test]
    fn test_describe() {
        let stream = stream![1, 2, 3, 4].filter(|x| *x > 1).map(|x| x + 1).peek(|_| {}).limit(2);
        assert_eq!(stream.to_string(), "source(4) -> filter -> map -> peek -> limit(2)");
    }
}
