/// One arena cell: either a live value or a vacancy linking to the next free cell.
#[derive(Debug)]
pub enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

impl<T> Slot<T> {
    pub fn next_free_exn(&self) -> Option<usize> {
        match self {
            Slot::Vacant(next) => *next,
            Slot::Occupied(_) => panic!("expected vacant slot"),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Occupied(t) => Some(t),
            Slot::Vacant(_) => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Occupied(t) => Some(t),
            Slot::Vacant(_) => None,
        }
    }

    pub fn value_exn(&self) -> &T {
        self.value().expect("expected occupied slot")
    }

    pub fn value_mut_exn(&mut self) -> &mut T {
        self.value_mut().expect("expected occupied slot")
    }

    pub fn into_value_exn(self) -> T {
        match self {
            Slot::Occupied(t) => t,
            Slot::Vacant(_) => panic!("expected occupied slot"),
        }
    }
}
