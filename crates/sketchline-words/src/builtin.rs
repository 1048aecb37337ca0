//! The built-in word list, used whenever no catalog is configured or the
//! catalog fails.

/// Common, easy-to-draw nouns and concepts. No duplicates.
pub const DEFAULT_WORDS: &[&str] = &[
    // food
    "apple", "banana", "bread", "cheese", "donut", "egg", "grapes", "hamburger",
    "honey", "ice cream", "jam", "kiwi", "lemon", "milk", "olive", "pear", "pizza",
    "rice", "salad", "tomato", "watermelon", "yogurt",
    // animals
    "ant", "bear", "bee", "bird", "butterfly", "camel", "cat", "chicken", "cow",
    "crocodile", "deer", "dinosaur", "dog", "dolphin", "duck", "eagle", "elephant",
    "fish", "fox", "frog", "giraffe", "gorilla", "horse", "jellyfish", "kangaroo",
    "lion", "monkey", "mouse", "octopus", "panda", "penguin", "pig", "rabbit",
    "shark", "sheep", "snail", "snake", "spider", "squirrel", "tiger", "turtle",
    "whale", "wolf", "zebra",
    // things around the house
    "bell", "book", "box", "camera", "chair", "comb", "desk", "door", "envelope",
    "fan", "glasses", "key", "ladder", "lamp", "mirror", "pencil", "scissors",
    "soap", "sponge", "table", "telephone", "toothbrush", "towel", "umbrella",
    "watch", "window",
    // clothes
    "boots", "coat", "dress", "gloves", "hat", "jacket", "scarf", "shirt", "shoes",
    "socks", "sweater", "tie",
    // vehicles
    "airplane", "bicycle", "bus", "car", "helicopter", "motorcycle", "rocket",
    "ship", "train", "truck", "yacht",
    // places
    "beach", "bridge", "castle", "farm", "forest", "hospital", "house", "igloo",
    "lighthouse", "library", "mountain", "museum", "ocean", "park", "river",
    "school", "volcano", "zoo",
    // nature
    "cloud", "fire", "flower", "moon", "rain", "rainbow", "snow", "snowman", "star",
    "storm", "sun", "tree", "wind",
    // people
    "chef", "doctor", "farmer", "firefighter", "nurse", "pilot", "queen", "robot",
    "sailor", "teacher", "unicorn", "zombie",
    // body
    "ear", "eye", "foot", "hand", "heart", "nose", "tooth",
    // play and music
    "ball", "balloon", "basketball", "doll", "drum", "football", "guitar", "kite",
    "piano", "puzzle", "swing", "teddy bear", "tennis", "trumpet", "violin",
    "xylophone", "yo-yo",
    // shapes
    "circle", "square", "triangle",
];

/// The built-in list as owned strings.
pub fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect()
}
