/// Progress reported while a string art is being generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// A pin has been placed; carries the number of pins placed so far.
    CreatingPin(usize),
    Baking,
    /// The greedy search is about to pick the line with this index.
    Computing(usize),
    /// The output canvas is being drawn; carries the number of lines drawn so far.
    Rendering(usize),
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

impl<F: FnMut(Message)> Verboser for F {
    fn verbose(&mut self, message: Message) {
        self(message)
    }
}
