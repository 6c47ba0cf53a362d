/// 执行期的处理单元，每个声明的操作在终止操作执行时被编译为一个`Stage`，多个`Stage`串联为一次遍历。
///
/// 调用顺序：
/// * `begin`在任何元素到达之前调用且只调用一次，参数是已知的剩余元素个数，未知时为`None`；
/// * `accept`对每个到达的元素调用一次，可以向下游发送零个、一个或多个元素；
/// * `can_finish`在每个元素到达之前查询，返回`true`时上游停止生产；
/// * `end`在最后一个元素之后（包括提前结束时）调用且只调用一次，用于冲刷缓存的状态。
///
/// 默认实现即终止`Stage`的行为：`begin`和`end`什么也不做，`can_finish`总是返回`false`。
pub trait Stage<T> {
    fn begin(&mut self, _size: Option<usize>) {}

    fn accept(&mut self, item: T);

    fn can_finish(&self) -> bool {
        false
    }

    fn end(&mut self) {}
}

/// 内层遍历的下游，用于`flat_map`：只转发元素与提前结束的判断，不向下游重复宣告开始与结束。
pub(crate) struct Inner<'d, D> {
    pub(crate) down: &'d mut D,
}

impl<T, D: Stage<T>> Stage<T> for Inner<'_, D> {
    fn accept(&mut self, item: T) {
        self.down.accept(item);
    }

    fn can_finish(&self) -> bool {
        self.down.can_finish()
    }
}

/// 记录调用过程的`Stage`，用于测试各操作对协议的遵守情况。
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct Recorder<T> {
    pub(crate) begins: Vec<Option<usize>>,
    pub(crate) items: Vec<T>,
    pub(crate) ends: usize,
    pub(crate) finish_after: Option<usize>,
}

#[cfg(test)]
impl<T> Recorder<T> {
    pub(crate) fn new() -> Self {
        Recorder { begins: Vec::new(), items: Vec::new(), ends: 0, finish_after: None }
    }

    pub(crate) fn finish_after(count: usize) -> Self {
        Recorder { finish_after: Some(count), ..Recorder::new() }
    }
}

#[cfg(test)]
impl<T> Stage<T> for Recorder<T> {
    fn begin(&mut self, size: Option<usize>) {
        assert!(self.items.is_empty(), "begin after accept");
        self.begins.push(size);
    }

    fn accept(&mut self, item: T) {
        assert_eq!(self.ends, 0, "accept after end");
        self.items.push(item);
    }

    fn can_finish(&self) -> bool {
        self.finish_after.is_some_and(|count| self.items.len() >= count)
    }

    fn end(&mut self) {
        self.ends += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sum(i32);

    impl Stage<i32> for Sum {
        fn accept(&mut self, item: i32) {
            self.0 += item;
        }
    }

    #[test]
    fn test_terminal_defaults() {
        let mut sum = Sum(0);
        sum.begin(Some(2));
        assert!(!sum.can_finish());
        sum.accept(1);
        sum.accept(2);
        sum.end();
        assert_eq!(sum.0, 3);
    }

    #[test]
    fn test_inner_forwards_only_elements() {
        let mut recorder = Recorder::finish_after(2);
        let mut inner = Inner { down: &mut recorder };
        inner.begin(Some(10));
        inner.accept(1);
        assert!(!inner.can_finish());
        inner.accept(2);
        assert!(inner.can_finish());
        inner.end();
        assert!(recorder.begins.is_empty());
        assert_eq!(recorder.items, vec![1, 2]);
        assert_eq!(recorder.ends, 0);
    }
}
