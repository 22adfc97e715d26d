//! Stream tap
//!
//! Decorators that observe a sequence without changing it. The consumer sees
//! exactly the elements of the wrapped sequence; the [`TapSink`] additionally
//! receives each element as a non-terminal write before it is handed on, and a
//! single terminal write once the wrapped sequence reports completion.
//!
//! - [`TappedIter`] - pull-driven, wraps an [`Iterator`]
//! - [`TappedStream`] - push-driven, wraps a [`futures::Stream`]
//!
//! If the consumer drops the wrapper before completion, the terminal write
//! never happens.

use futures::stream::{FusedStream, Stream};
use std::iter::FusedIterator;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Receiver of tapped elements.
///
/// `write(Some(element), false)` for every element, then `write(None, true)`
/// exactly once after completion.
pub trait TapSink<T> {
    fn write(&self, element: Option<&T>, is_terminal: bool);
}

impl<T, F> TapSink<T> for F
where
    F: Fn(Option<&T>, bool),
{
    fn write(&self, element: Option<&T>, is_terminal: bool) {
        self(element, is_terminal)
    }
}

/// Forwards only the `Ok` elements of a fallible sequence.
///
/// Errors still reach the consumer untouched; they are just not logged.
pub struct OkOnly<K>(pub K);

impl<T, E, K> TapSink<Result<T, E>> for OkOnly<K>
where
    K: TapSink<T>,
{
    fn write(&self, element: Option<&Result<T, E>>, is_terminal: bool) {
        match element {
            Some(Ok(value)) => self.0.write(Some(value), is_terminal),
            Some(Err(_)) => {}
            None => self.0.write(None, is_terminal),
        }
    }
}

/// Pull-driven tap over an iterator.
pub struct TappedIter<I, K> {
    inner: I,
    sink: K,
    finished: bool,
}

impl<I, K> TappedIter<I, K>
where
    I: Iterator,
    K: TapSink<I::Item>,
{
    pub fn new(inner: I, sink: K) -> Self {
        Self {
            inner,
            sink,
            finished: false,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

impl<I, K> Iterator for TappedIter<I, K>
where
    I: Iterator,
    K: TapSink<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            Some(item) => {
                self.sink.write(Some(&item), false);
                Some(item)
            }
            None => {
                self.finished = true;
                self.sink.write(None, true);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl<I, K> std::fmt::Debug for TappedIter<I, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TappedIter")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<I, K> FusedIterator for TappedIter<I, K>
where
    I: Iterator,
    K: TapSink<I::Item>,
{
}

/// Push-driven tap over a stream.
pub struct TappedStream<S, K> {
    inner: Pin<Box<S>>,
    sink: K,
    finished: bool,
}

// The sink is never pinned and the inner stream is boxed.
impl<S, K> Unpin for TappedStream<S, K> {}

impl<S, K> TappedStream<S, K>
where
    S: Stream,
    K: TapSink<S::Item>,
{
    pub fn new(inner: S, sink: K) -> Self {
        Self {
            inner: Box::pin(inner),
            sink,
            finished: false,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

impl<S, K> Stream for TappedStream<S, K>
where
    S: Stream,
    K: TapSink<S::Item>,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(item)) => {
                this.sink.write(Some(&item), false);
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                this.finished = true;
                this.sink.write(None, true);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl<S, K> std::fmt::Debug for TappedStream<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TappedStream")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<S, K> FusedStream for TappedStream<S, K>
where
    S: Stream,
    K: TapSink<S::Item>,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
