use crate::Result;

/// A wire format for objects.
///
/// Concrete codecs opt into individual types through [`EncodeFor`] and
/// [`DecodeFor`]; the provided methods only dispatch to those impls.
pub trait Codec: Send + Sync {
    type Data: Send + Sync;

    fn encode<E>(&self, obj: &E) -> Result<Self::Data>
    where
        E: ?Sized,
        Self: EncodeFor<Self, E>,
    {
        <Self as EncodeFor<Self, E>>::encode(self, obj)
    }

    fn decode<D>(&self, data: &Self::Data) -> Result<D>
    where
        Self: DecodeFor<Self, D>,
    {
        <Self as DecodeFor<Self, D>>::decode(self, data)
    }
}

pub trait EncodeFor<C: Codec + ?Sized, E: ?Sized> {
    fn encode(codec: &C, obj: &E) -> Result<C::Data>;
}

pub trait DecodeFor<C: Codec + ?Sized, D> {
    fn decode(codec: &C, data: &C::Data) -> Result<D>;
}
