use crate::{
    Error, Result,
    constants::RECORD_SIZE,
    geo::{GeoPoint, LocationToken},
};

/// Fixed-size binary encoding of a coordinate.
pub trait Record: Sized {
    const SIZE: usize;

    fn decode(bytes: &[u8]) -> Result<Self>;

    fn encode(&self, out: &mut Vec<u8>);
}

impl Record for LocationToken {
    const SIZE: usize = RECORD_SIZE;

    fn decode(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; RECORD_SIZE] = bytes.try_into().map_err(|_| Error::Format {
            size: bytes.len(),
            record_size: RECORD_SIZE,
        })?;
        Ok(Self::from_le_bytes(raw))
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Record for GeoPoint {
    const SIZE: usize = RECORD_SIZE;

    fn decode(bytes: &[u8]) -> Result<Self> {
        GeoPoint::from_token(LocationToken::decode(bytes)?)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.token().encode(out);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Location<C> {
    index: usize,
    order: Option<usize>,
    coordinate: C,
}

impl<C> Location<C> {
    /// Array position at load time.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Visitation order, `None` while unvisited.
    pub fn order(&self) -> Option<usize> {
        self.order
    }

    pub fn coordinate(&self) -> &C {
        &self.coordinate
    }

    pub fn is_visited(&self) -> bool {
        self.order.is_some()
    }

    pub(crate) fn into_coordinate(self) -> C {
        self.coordinate
    }
}

/// Memory-resident array of locations, each with a write-once visit order.
#[derive(Clone, Debug)]
pub struct LocationStore<C> {
    locations: Vec<Location<C>>,
    visited: usize,
}

impl<C> LocationStore<C> {
    pub fn from_coordinates(coordinates: impl IntoIterator<Item = C>) -> Self {
        Self {
            locations: coordinates
                .into_iter()
                .enumerate()
                .map(|(index, coordinate)| Location {
                    index,
                    order: None,
                    coordinate,
                })
                .collect(),
            visited: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    pub fn locations(&self) -> &[Location<C>] {
        &self.locations
    }

    pub fn get(&self, index: usize) -> Option<&Location<C>> {
        self.locations.get(index)
    }

    #[inline]
    pub(crate) fn is_visited(&self, index: usize) -> bool {
        self.locations[index].order.is_some()
    }

    #[inline]
    pub(crate) fn coordinate(&self, index: usize) -> &C {
        &self.locations[index].coordinate
    }

    /// Records `index` as the `order`-th stop. Each location is visited once.
    pub(crate) fn visit(&mut self, index: usize, order: usize) -> Result<()> {
        let len = self.locations.len();
        let location = self.locations.get_mut(index).ok_or_else(|| {
            Error::invariant(format!("visit: index={index} outside store of len={len}"))
        })?;
        if let Some(previous) = location.order {
            return Err(Error::invariant(format!(
                "visit: index={index} already has order={previous}, refusing order={order}"
            )));
        }
        location.order = Some(order);
        self.visited += 1;
        Ok(())
    }

    pub(crate) fn locations_mut(&mut self) -> &mut [Location<C>] {
        &mut self.locations
    }

    pub(crate) fn into_locations(self) -> Vec<Location<C>> {
        self.locations
    }
}

impl<C: Record> LocationStore<C> {
    /// Decodes a flat, header-less run of records, all initially unvisited.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % C::SIZE != 0 {
            return Err(Error::Format {
                size: bytes.len(),
                record_size: C::SIZE,
            });
        }
        let coordinates = bytes
            .chunks_exact(C::SIZE)
            .map(C::decode)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_coordinates(coordinates))
    }
}
