//! Split an event's particles into the Higgs candidate and the jets.

use hj_core::{EventRecord, FourVector};

/// Per-event view: the Higgs (if any) and the remaining particles as jets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedEvent {
    /// Four-momentum of the Higgs; the last matching particle wins.
    pub higgs: Option<FourVector>,
    /// Every other particle, in source order.
    pub jets: Vec<FourVector>,
}

/// Classify `record` by identity code. Unknown codes are treated as jets.
pub fn classify(record: &EventRecord, higgs_pid: i32) -> ClassifiedEvent {
    let mut event = ClassifiedEvent { higgs: None, jets: Vec::with_capacity(record.len()) };
    for particle in &record.particles {
        if particle.pid == higgs_pid {
            event.higgs = Some(particle.p4);
        } else {
            event.jets.push(particle.p4);
        }
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use hj_core::HIGGS_PID;

    fn p4(px: f64) -> FourVector {
        FourVector::new(px, 0.0, 0.0, px.abs())
    }

    #[test]
    fn splits_higgs_from_jets_in_order() {
        let ev = EventRecord::new(Vec::new(), 1.0)
            .with_particle(21, p4(1.0))
            .with_particle(HIGGS_PID, p4(2.0))
            .with_particle(-3, p4(3.0))
            .with_particle(9999, p4(4.0));
        let c = classify(&ev, HIGGS_PID);
        assert_eq!(c.higgs, Some(p4(2.0)));
        assert_eq!(c.jets, vec![p4(1.0), p4(3.0), p4(4.0)]);
    }

    #[test]
    fn last_higgs_wins() {
        let ev = EventRecord::new(Vec::new(), 1.0)
            .with_particle(HIGGS_PID, p4(10.0))
            .with_particle(HIGGS_PID, p4(20.0));
        let c = classify(&ev, HIGGS_PID);
        assert_eq!(c.higgs, Some(p4(20.0)));
        assert!(c.jets.is_empty());
    }

    #[test]
    fn no_higgs_leaves_slot_empty() {
        let ev = EventRecord::new(Vec::new(), 1.0).with_particle(21, p4(5.0));
        let c = classify(&ev, HIGGS_PID);
        assert!(c.higgs.is_none());
        assert_eq!(c.jets.len(), 1);
    }

    #[test]
    fn empty_record() {
        let c = classify(&EventRecord::default(), HIGGS_PID);
        assert_eq!(c, ClassifiedEvent::default());
    }
}
