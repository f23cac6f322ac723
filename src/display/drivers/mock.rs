/*
 *  display/drivers/mock.rs
 *
 *  wxpaper - weather on paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::sync::{Arc, Mutex};

use crate::canvas::Canvas;
use crate::display::error::DisplayError;
use crate::display::traits::DisplaySink;

/// Records refreshes instead of driving a panel.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    state: Arc<Mutex<MockSinkState>>,
}

/// Shared so a test can keep a handle after the sink is boxed.
#[derive(Debug, Default)]
pub struct MockSinkState {
    /// Number of successful display() calls
    pub display_count: usize,

    /// Canvas from the last successful call
    pub last_canvas: Option<Canvas>,

    /// Fail the next display() calls
    pub simulate_failure: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<Mutex<MockSinkState>> {
        Arc::clone(&self.state)
    }

    pub fn fail_next(&self) {
        self.state.lock().unwrap().simulate_failure = true;
    }
}

impl DisplaySink for MockSink {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
        self.check_size(canvas)?;
        let mut state = self.state.lock().unwrap();
        if state.simulate_failure {
            return Err(DisplayError::Other("Simulated refresh failure".to_string()));
        }
        state.display_count += 1;
        state.last_canvas = Some(canvas.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_refresh() {
        let mut sink = MockSink::new();
        let state = sink.state();
        assert_eq!(state.lock().unwrap().display_count, 0);

        sink.display(&Canvas::dashboard()).unwrap();
        assert_eq!(state.lock().unwrap().display_count, 1);
        assert!(state.lock().unwrap().last_canvas.is_some());
    }

    #[test]
    fn test_mock_simulated_failure() {
        let mut sink = MockSink::new();
        sink.fail_next();
        assert!(matches!(sink.display(&Canvas::dashboard()), Err(DisplayError::Other(_))));
        assert_eq!(sink.state().lock().unwrap().display_count, 0);
    }
}
