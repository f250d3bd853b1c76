use crate::geometry::{Point, Shape, ShapeId};

/// A reversible edit of the sketch's shape list, for the undo/redo journal.
pub trait Command: std::fmt::Debug + Send {
    /// Apply the edit.
    fn execute(&mut self, shapes: &mut Vec<Shape>);
    /// Reverse the edit.
    fn undo(&mut self, shapes: &mut Vec<Shape>);
    /// Human-readable description for the undo/redo history.
    fn description(&self) -> &str;
}

fn position_of(shapes: &[Shape], id: ShapeId) -> Option<usize> {
    shapes.iter().position(|s| s.id == id)
}

// ══════════════════════════════════════════════════════════════════════
// Concrete Commands
// ══════════════════════════════════════════════════════════════════════

/// Append a shape to the sketch.
#[derive(Debug)]
pub struct AddShapeCommand {
    pub shape: Shape,
}

impl AddShapeCommand {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

impl Command for AddShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) {
        shapes.push(self.shape.clone());
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(idx) = position_of(shapes, self.shape.id) {
            shapes.remove(idx);
        }
    }

    fn description(&self) -> &str {
        "Add shape"
    }
}

/// Remove a shape by identity.
#[derive(Debug)]
pub struct RemoveShapeCommand {
    pub id: ShapeId,
    /// The removed shape and its position (saved for undo).
    removed: Option<(usize, Shape)>,
}

impl RemoveShapeCommand {
    pub fn new(id: ShapeId) -> Self {
        Self { id, removed: None }
    }
}

impl Command for RemoveShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(idx) = position_of(shapes, self.id) {
            self.removed = Some((idx, shapes.remove(idx)));
        }
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some((idx, shape)) = self.removed.take() {
            // Re-insert at the original position so check order is restored.
            if idx <= shapes.len() {
                shapes.insert(idx, shape);
            } else {
                shapes.push(shape);
            }
        }
    }

    fn description(&self) -> &str {
        "Remove shape"
    }
}

/// Move a shape's top-left corner to a new position.
#[derive(Debug)]
pub struct MoveShapeCommand {
    pub id: ShapeId,
    pub to: Point,
    /// Position before the move (set on execute).
    from: Option<Point>,
}

impl MoveShapeCommand {
    pub fn new(id: ShapeId, to: Point) -> Self {
        Self { id, to, from: None }
    }
}

impl Command for MoveShapeCommand {
    fn execute(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(shape) = shapes.iter_mut().find(|s| s.id == self.id) {
            self.from = Some(Point::new(shape.x, shape.y));
            shape.x = self.to.x;
            shape.y = self.to.y;
        }
    }

    fn undo(&mut self, shapes: &mut Vec<Shape>) {
        if let Some(from) = self.from {
            if let Some(shape) = shapes.iter_mut().find(|s| s.id == self.id) {
                shape.x = from.x;
                shape.y = from.y;
            }
        }
    }

    fn description(&self) -> &str {
        "Move shape"
    }
}

/// Manages the undo/redo history stack.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn execute(&mut self, mut command: Box<dyn Command>, shapes: &mut Vec<Shape>) {
        command.execute(shapes);
        self.undo_stack.push(command);
        // Executing a new command clears the redo stack.
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if let Some(mut command) = self.undo_stack.pop() {
            command.undo(shapes);
            self.redo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, shapes: &mut Vec<Shape>) -> bool {
        if let Some(mut command) = self.redo_stack.pop() {
            command.execute(shapes);
            self.undo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }
}
