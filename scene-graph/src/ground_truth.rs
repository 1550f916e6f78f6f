//! Run-length encoded action segmentation of one hand.

use crate::common::*;

/// The action timeline of one hand.
///
/// The serialized form is the flat list `[t0, a0, t1, a1, ..., tn]`, where
/// `a_i` is active on frames `t_i..t_{i+1}` and the terminal frame `tn` is
/// labelled with the last action. A `null` action marks an unknown action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<usize>>", into = "Vec<Option<usize>>")]
pub struct GroundTruth {
    boundaries: Vec<usize>,
    actions: Vec<Option<Action>>,
}

impl GroundTruth {
    pub fn new(timeline: Vec<Option<usize>>) -> Result<Self> {
        ensure!(
            timeline.len() >= 3 && timeline.len() % 2 == 1,
            "a timeline must have an odd length of at least 3, but found {}",
            timeline.len()
        );

        let boundaries: Vec<usize> = timeline
            .iter()
            .step_by(2)
            .enumerate()
            .map(|(index, boundary)| {
                boundary.ok_or_else(|| format_err!("boundary at position {} is null", index * 2))
            })
            .try_collect()?;
        let actions: Vec<Option<Action>> = timeline
            .iter()
            .skip(1)
            .step_by(2)
            .map(|action| action.map(Action::try_from_index).transpose())
            .try_collect()?;

        if let Some((index, (prev, next))) = boundaries
            .iter()
            .tuple_windows()
            .find_position(|(prev, next)| prev > next)
        {
            bail!(
                "boundary {} at position {} is lower than its predecessor {}",
                next,
                (index + 1) * 2,
                prev
            );
        }

        Ok(Self {
            boundaries,
            actions,
        })
    }

    /// Compresses a per-frame action list into a timeline.
    pub fn from_frames(frames: &[Option<Action>]) -> Result<Self> {
        ensure!(!frames.is_empty(), "cannot build a timeline from zero frames");

        let (mut boundaries, actions): (Vec<usize>, Vec<Option<Action>>) = frames
            .iter()
            .enumerate()
            .dedup_by(|lhs, rhs| lhs.1 == rhs.1)
            .map(|(frame, &action)| (frame, action))
            .unzip();
        boundaries.push(frames.len() - 1);

        Ok(Self {
            boundaries,
            actions,
        })
    }

    /// The exclusive upper bound of valid frame indices.
    pub fn len(&self) -> usize {
        self.terminal() + 1
    }

    /// The first annotated frame.
    pub fn first(&self) -> usize {
        self.boundaries[0]
    }

    fn terminal(&self) -> usize {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// The action of the given frame, or `None` if it is not known.
    pub fn lookup(&self, frame: usize) -> Result<Option<Action>> {
        let terminal = self.terminal();
        ensure!(
            (self.first()..=terminal).contains(&frame),
            "frame {} is out of the annotated range {}..={}",
            frame,
            self.first(),
            terminal
        );

        if frame == terminal {
            return Ok(self.actions[self.actions.len() - 1]);
        }

        // frame < terminal, so the partition point lies in 1..=actions.len()
        let index = self.boundaries.partition_point(|&boundary| boundary <= frame) - 1;
        Ok(self.actions[index])
    }

    /// Iterates `(first_frame, action, last_frame)` of each non-empty
    /// segment, with inclusive frame bounds.
    pub fn segments(&self) -> impl Iterator<Item = (usize, Option<Action>, usize)> + '_ {
        let last = self.actions.len() - 1;

        self.boundaries
            .iter()
            .tuple_windows()
            .zip(self.actions.iter())
            .enumerate()
            .filter_map(move |(index, ((&start, &end), &action))| {
                if index == last {
                    Some((start, action, end))
                } else if end > start {
                    Some((start, action, end - 1))
                } else {
                    None
                }
            })
    }
}

impl TryFrom<Vec<Option<usize>>> for GroundTruth {
    type Error = Error;

    fn try_from(timeline: Vec<Option<usize>>) -> Result<Self, Self::Error> {
        Self::new(timeline)
    }
}

impl From<GroundTruth> for Vec<Option<usize>> {
    fn from(from: GroundTruth) -> Self {
        let GroundTruth {
            boundaries,
            actions,
        } = from;
        let actions = actions
            .into_iter()
            .map(|action| action.map(Action::index));
        boundaries
            .into_iter()
            .map(Some)
            .interleave(actions)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Action = Action::Approach;
    const B: Action = Action::Hold;

    fn timeline() -> GroundTruth {
        GroundTruth::new(vec![Some(0), Some(A.index()), Some(5), Some(B.index()), Some(5)])
            .unwrap()
    }

    #[test]
    fn terminal_frame_takes_last_action() {
        let gt = timeline();
        assert_eq!(gt.len(), 6);
        for frame in 0..5 {
            assert_eq!(gt.lookup(frame).unwrap(), Some(A));
        }
        assert_eq!(gt.lookup(5).unwrap(), Some(B));
        assert!(gt.lookup(6).is_err());
    }

    #[test]
    fn frames_before_first_boundary_are_out_of_range() {
        let gt = GroundTruth::new(vec![Some(2), Some(A.index()), Some(4)]).unwrap();
        assert!(gt.lookup(1).is_err());
        assert_eq!(gt.lookup(2).unwrap(), Some(A));
        assert_eq!(gt.lookup(4).unwrap(), Some(A));
    }

    #[test]
    fn null_action_is_unknown() {
        let gt = GroundTruth::new(vec![Some(0), None, Some(3), Some(A.index()), Some(6)]).unwrap();
        assert_eq!(gt.lookup(2).unwrap(), None);
        assert_eq!(gt.lookup(3).unwrap(), Some(A));
        assert_eq!(gt.lookup(6).unwrap(), Some(A));
    }

    #[test]
    fn malformed_timelines_are_rejected() {
        assert!(GroundTruth::new(vec![]).is_err());
        assert!(GroundTruth::new(vec![Some(0), Some(1)]).is_err());
        assert!(GroundTruth::new(vec![None, Some(1), Some(3)]).is_err());
        assert!(GroundTruth::new(vec![Some(4), Some(1), Some(3)]).is_err());
        assert!(GroundTruth::new(vec![Some(0), Some(Action::COUNT), Some(3)]).is_err());
    }

    #[test]
    fn segments_have_inclusive_bounds() {
        let segments: Vec<_> = timeline().segments().collect();
        assert_eq!(segments, vec![(0, Some(A), 4), (5, Some(B), 5)]);
    }

    #[test]
    fn interior_empty_segment_is_skipped() {
        const C: Action = Action::Pour;
        let gt = GroundTruth::new(vec![
            Some(0),
            Some(A.index()),
            Some(3),
            Some(B.index()),
            Some(3),
            Some(C.index()),
            Some(6),
        ])
        .unwrap();

        assert_eq!(gt.lookup(2).unwrap(), Some(A));
        assert_eq!(gt.lookup(3).unwrap(), Some(C));
        assert_eq!(gt.lookup(6).unwrap(), Some(C));
        assert!((0..=6).all(|frame| gt.lookup(frame).unwrap() != Some(B)));

        let segments: Vec<_> = gt.segments().collect();
        assert_eq!(segments, vec![(0, Some(A), 2), (3, Some(C), 6)]);
    }

    #[test]
    fn compress_frames() {
        let frames = [None, Some(A), Some(A), Some(A), Some(B), Some(B)];
        let gt = GroundTruth::from_frames(&frames).unwrap();
        assert_eq!(gt.len(), frames.len());
        for (frame, &action) in frames.iter().enumerate() {
            assert_eq!(gt.lookup(frame).unwrap(), action);
        }
        assert_eq!(
            Vec::from(gt),
            vec![
                Some(0),
                None,
                Some(1),
                Some(A.index()),
                Some(4),
                Some(B.index()),
                Some(5)
            ]
        );
        assert!(GroundTruth::from_frames(&[]).is_err());
    }

    #[test]
    fn json_timeline() {
        let gt: GroundTruth = serde_json::from_str("[0, 1, 5, 5, 5]").unwrap();
        assert_eq!(gt, timeline());
        assert_eq!(serde_json::to_string(&gt).unwrap(), "[0,1,5,5,5]");
        assert!(serde_json::from_str::<GroundTruth>("[0, 1, 5, 99, 6]").is_err());
    }
}
