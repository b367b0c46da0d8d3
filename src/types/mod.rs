/*!
Supporting types shared across the library: the error hierarchy, and the
small id/key newtypes used to index into the pgraph and reason arenas.
*/

pub mod err;
