use super::*;
use crate::AlignmentLineMerge;

struct Recorder {
    direction: LayoutDirection,
    placed: Vec<(NodeId, f32, f32, i32)>,
}

impl PlacementScope for Recorder {
    fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }

    fn place_with_z(&mut self, node_id: NodeId, x: f32, y: f32, z_index: i32) {
        self.placed.push((node_id, x, y, z_index));
    }
}

struct Fixed(NodeId, Size);

impl Placeable for Fixed {
    fn width(&self) -> f32 {
        self.1.width
    }

    fn height(&self) -> f32 {
        self.1.height
    }

    fn node_id(&self) -> NodeId {
        self.0
    }

    fn get(&self, _line: AlignmentLine) -> Option<f32> {
        None
    }
}

struct Noop;

impl MeasurePolicy for Noop {
    fn measure(
        &self,
        _scope: &dyn MeasureScope,
        _measurables: &[Box<dyn Measurable>],
        _constraints: Constraints,
    ) -> MeasureResult {
        MeasureResult::default()
    }

    fn min_intrinsic_width(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
        0.0
    }

    fn max_intrinsic_width(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
        0.0
    }

    fn min_intrinsic_height(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
        0.0
    }

    fn max_intrinsic_height(&self, _: &dyn MeasureScope, _: &[Box<dyn Measurable>], _: f32) -> f32 {
        0.0
    }
}

#[test]
fn default_place_children_replays_records() {
    let result = MeasureResult::new(
        Size::new(10.0, 10.0),
        vec![Placement::new(3, 1.0, 2.0, 0), Placement::new(4, 5.0, 6.0, 2)],
    );
    let mut scope = Recorder {
        direction: LayoutDirection::Ltr,
        placed: Vec::new(),
    };
    Noop.place_children(&mut scope, &[], &result);
    assert_eq!(scope.placed, vec![(3, 1.0, 2.0, 0), (4, 5.0, 6.0, 2)]);
}

#[test]
fn place_relative_mirrors_in_rtl() {
    let mut scope = Recorder {
        direction: LayoutDirection::Rtl,
        placed: Vec::new(),
    };
    scope.place_relative(&Fixed(9, Size::new(20.0, 5.0)), 10.0, 0.0, 100.0);
    assert_eq!(scope.placed, vec![(9, 70.0, 0.0, 0)]);
}

#[test]
fn baselines_merge_towards_their_edge() {
    assert_eq!(AlignmentLine::FirstBaseline.merge(10.0, 4.0), 4.0);
    assert_eq!(AlignmentLine::LastBaseline.merge(10.0, 4.0), 10.0);
    let custom = AlignmentLine::vertical(1, AlignmentLineMerge::Max);
    assert_eq!(custom.merge(1.0, 2.0), 2.0);
    assert_eq!(custom.offset_by(3.0, 10.0, 20.0), 13.0);
    assert_eq!(AlignmentLine::FirstBaseline.offset_by(3.0, 10.0, 20.0), 23.0);
}
