//! Per-method queue of prearranged return tuples.

use std::collections::VecDeque;

use crate::value::MockValue;

/// Queued responses for one mocked method.
///
/// Each element of the queue is one return tuple: the full set of values for
/// one simulated call. The queue starts in peek mode, where a single tuple
/// is reused indefinitely; it switches to consuming mode the first time a
/// consultation finds more than one tuple queued, and from then on each
/// consultation removes the head. Replacing or appending returns resets the
/// queue to peek mode.
#[derive(Debug)]
pub struct MockResponse {
    queue: VecDeque<Vec<MockValue>>,
    consuming: bool,
}

impl MockResponse {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            consuming: false,
        }
    }

    /// Replace the entire queue with a single tuple.
    pub(crate) fn set_returns(&mut self, values: Vec<MockValue>) {
        self.queue.clear();
        self.queue.push_back(values);
        self.consuming = false;
    }

    /// Append one tuple at the tail.
    pub(crate) fn push_return(&mut self, values: Vec<MockValue>) {
        self.queue.push_back(values);
        self.consuming = false;
    }

    /// Queue copies of the current first tuple so it serves `times`
    /// consultations in total. Counts of zero or one add nothing; an empty
    /// queue is left untouched. Copies are appended after everything already
    /// queued.
    pub(crate) fn repeat(&mut self, times: usize) {
        let Some(head) = self.queue.front().cloned() else {
            return;
        };
        for _ in 1..times {
            self.push_return(head.clone());
        }
    }

    /// Advance the queue for one consultation and report whether a response
    /// remains.
    pub(crate) fn consult(&mut self) -> bool {
        if !self.queue.is_empty() {
            if self.consuming {
                self.queue.pop_front();
            } else if self.queue.len() > 1 {
                // Popping only starts once a consultation has seen multiple
                // queued tuples; the head stays in place for this call.
                self.consuming = true;
            }
        }
        !self.queue.is_empty()
    }

    /// Whether a response is currently available, without advancing.
    pub(crate) fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Slot `index` of the head tuple, if present.
    pub(crate) fn slot(&self, index: usize) -> Option<MockValue> {
        self.queue.front()?.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use rstest::rstest;

    fn head_str(response: &MockResponse) -> Option<String> {
        response.slot(0)?.get()
    }

    #[rstest]
    fn test_single_tuple_is_reused() {
        let mut response = MockResponse::new();
        response.set_returns(values![String::from("only")]);

        for _ in 0..5 {
            assert!(response.consult());
            assert_eq!(head_str(&response), Some(String::from("only")));
        }
    }

    #[rstest]
    fn test_multiple_tuples_pop_from_second_consultation() {
        let mut response = MockResponse::new();
        response.push_return(values![String::from("first")]);
        response.push_return(values![String::from("second")]);

        assert!(response.consult());
        assert_eq!(head_str(&response), Some(String::from("first")));
        assert!(response.consult());
        assert_eq!(head_str(&response), Some(String::from("second")));
        assert!(!response.consult());
        assert!(!response.has_pending());
    }

    #[rstest]
    fn test_set_returns_replaces_queue() {
        let mut response = MockResponse::new();
        response.push_return(values![String::from("a")]);
        response.push_return(values![String::from("b")]);
        assert!(response.consult());

        response.set_returns(values![String::from("replacement")]);
        for _ in 0..3 {
            assert!(response.consult());
            assert_eq!(head_str(&response), Some(String::from("replacement")));
        }
    }

    #[rstest]
    fn test_push_after_consuming_restarts_peek_mode() {
        let mut response = MockResponse::new();
        response.push_return(values![String::from("a")]);
        response.push_return(values![String::from("b")]);
        assert!(response.consult());

        // The append drops consuming mode, so the next consultation observes
        // the head again without popping it.
        response.push_return(values![String::from("c")]);
        assert!(response.consult());
        assert_eq!(head_str(&response), Some(String::from("a")));
        assert!(response.consult());
        assert_eq!(head_str(&response), Some(String::from("b")));
        assert!(response.consult());
        assert_eq!(head_str(&response), Some(String::from("c")));
        assert!(!response.consult());
    }

    #[rstest]
    fn test_repeat_duplicates_first_tuple_at_tail() {
        let mut response = MockResponse::new();
        response.set_returns(values![String::from("a")]);
        response.push_return(values![String::from("b")]);
        response.repeat(3);

        let expected = ["a", "b", "a", "a"];
        for text in expected {
            assert!(response.consult());
            assert_eq!(head_str(&response), Some(String::from(text)));
        }
        assert!(!response.consult());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_repeat_small_counts_add_nothing(#[case] times: usize) {
        let mut response = MockResponse::new();
        response.set_returns(values![String::from("x")]);
        response.repeat(times);

        // A single tuple is reused forever; had `repeat` queued a copy, the
        // third consultation would find the queue exhausted.
        for _ in 0..3 {
            assert!(response.consult());
            assert_eq!(head_str(&response), Some(String::from("x")));
        }
    }

    #[rstest]
    fn test_repeat_on_empty_queue_is_noop() {
        let mut response = MockResponse::new();
        response.repeat(4);
        assert!(!response.has_pending());
        assert!(!response.consult());
    }

    #[rstest]
    fn test_slot_out_of_range() {
        let mut response = MockResponse::new();
        response.set_returns(values![String::from("a"), 2_i64]);

        assert!(response.slot(0).is_some());
        assert!(response.slot(1).is_some());
        assert!(response.slot(2).is_none());
    }

    #[rstest]
    fn test_empty_queue_has_no_slots() {
        let response = MockResponse::new();
        assert!(response.slot(0).is_none());
    }
}
