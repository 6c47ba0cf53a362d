use crate::source::Source;
use crate::stage::Stage;
use itertools::Itertools;
use std::fmt;
use tracing::{debug, trace};

/// 流水线节点，记录一个已声明的操作。
///
/// 头节点持有数据源，其余节点持有前一个节点与操作参数，本身不保存任何元素状态，只知道如何在给定的下游`Stage`外
/// 包装出自己的`Stage`。终止操作把终止`Stage`交给最后一个节点，各节点依次包装后交给前一个节点，最终由头节点
/// 驱动数据源遍历；遍历结束后各节点拆出自己包装的下游，把终止`Stage`连同结果原样交还。
///
/// ```text
///            head    filter   map
///            +--+    +---+    +--+
///            |  | <- |   | <- |  | <- terminal stage
///            +--+    +---+    +--+
///
///                +-filter----------------+
///  source -->    |       +-map-----------+
///                |       |    +-terminal-+
///                +-------+----+----------+
/// ```
pub trait Pipeline {
    type Item;

    /// 用本节点的`Stage`包装`down`并交给前一个节点执行，返回执行完毕的`down`。
    fn run<D: Stage<Self::Item>>(self, down: D) -> D;

    /// 按声明顺序追加各节点的描述。
    fn describe(&self, ops: &mut Vec<String>);
}

/// 头节点，唯一持有数据源的节点。
pub struct Head<S> {
    source: S,
}

impl<S: Source> Head<S> {
    pub fn new(source: S) -> Self {
        Head { source }
    }
}

impl<S: Source> Pipeline for Head<S> {
    type Item = S::Item;

    fn run<D: Stage<S::Item>>(self, mut stage: D) -> D {
        let mut source = self.source;
        let size = source.size_if_known();
        trace!(?size, "source iteration started");
        stage.begin(size);
        let mut pulled = 0usize;
        while !stage.can_finish() && source.has_next() {
            stage.accept(source.next());
            pulled += 1;
        }
        if stage.can_finish() {
            debug!(pulled, "source iteration short-circuited");
        }
        stage.end();
        stage
    }

    fn describe(&self, ops: &mut Vec<String>) {
        match self.source.size_if_known() {
            Some(size) => ops.push(format!("source({size})")),
            None => ops.push("source(?)".to_owned()),
        }
    }
}

/// 惰性求值的流，对流水线节点的封装，提供链式的中间操作与终止操作。
///
/// 中间操作只构建新的节点，不会触碰数据源；终止操作消费整个流，因此一个流只能被执行一次。
#[must_use = "streams are lazy and do nothing unless a terminal operation is called"]
pub struct Stream<P> {
    pub(crate) pipeline: P,
}

impl<P: Pipeline> Stream<P> {
    pub fn new(pipeline: P) -> Self {
        Stream { pipeline }
    }

    /// 以给定的`Stage`作为终止`Stage`执行整个流水线，返回执行完毕的`Stage`。
    pub fn execute<D: Stage<P::Item>>(self, stage: D) -> D {
        debug!(pipeline = %self, "terminal operation started");
        self.pipeline.run(stage)
    }

    pub(crate) fn chain<Q: Pipeline>(self, wrap: impl FnOnce(P) -> Q) -> Stream<Q> {
        Stream { pipeline: wrap(self.pipeline) }
    }
}

impl<P: Pipeline> fmt::Display for Stream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ops = Vec::new();
        self.pipeline.describe(&mut ops);
        write!(f, "{}", ops.iter().join(" -> "))
    }
}

impl<P: Pipeline> fmt::Debug for Stream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream[{self}]")
    }
}
